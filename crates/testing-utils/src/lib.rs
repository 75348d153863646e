//! # Scheduler Testing Utils
//!
//! 工作区共享的测试工具：协作方接口的内存替身与测试数据构建器。
//!
//! ```toml
//! [dev-dependencies]
//! scheduler-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
