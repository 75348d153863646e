//! 协作方接口的快照实现
//!
//! 从JSON快照文件加载调度器状态，在内存中同时实现任务源、CRON注册表和配额服务。

pub mod in_memory_store;
pub mod snapshot;

pub use in_memory_store::InMemorySchedulerStore;
pub use snapshot::SchedulerSnapshot;
