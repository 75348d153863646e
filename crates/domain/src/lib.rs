//! 角色视图领域模型
//!
//! 定义任务、状态分组、CRON作业定义、资源配额以及最终视图模型，
//! 并声明核心逻辑依赖的外部协作方接口（任务源、CRON注册表、配额服务、时钟）。

pub mod entities;
pub mod ports;

pub use entities::*;
pub use ports::*;
pub use scheduler_errors::{SchedulerError, SchedulerResult};
