//! 角色视图核心逻辑
//!
//! - `status_classifier` - 任务状态到展示分组的映射
//! - `job_aggregator` - 按作业名聚合任务计数
//! - `cron_projector` - CRON作业过滤与下次执行时间推算
//! - `role_view_service` - 组装最终的角色视图

pub mod services;

pub use services::*;
