//! 外部协作方接口
//!
//! 核心逻辑只通过这些接口读取调度器状态：
//! - `TaskSource` - 按角色查询任务
//! - `CronRegistry` - 列出CRON作业定义并推算下次执行时间
//! - `QuotaService` - 查询角色的资源消耗与配额
//! - `Clock` - 提供当前时间，便于测试时固定
//!
//! 所有接口均为异步并要求 `Send + Sync`，实现方可以是内存快照，也可以是远程服务。

mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{CronJobDefinition, ResourceFigure, ScheduledTask};
use scheduler_errors::SchedulerResult;

/// 任务源
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// 返回角色当前的全部任务，可能为空
    async fn get_tasks_by_role(&self, role: &str) -> SchedulerResult<Vec<ScheduledTask>>;
}

/// CRON注册表
#[async_trait]
pub trait CronRegistry: Send + Sync {
    /// 返回所有已知的CRON作业定义（不区分角色）
    async fn get_cron_jobs(&self) -> SchedulerResult<Vec<CronJobDefinition>>;

    /// 推算 `after` 之后的下一次执行时间，表达式无法解析时返回 `InvalidCron`
    fn predict_next_run(
        &self,
        cron_schedule: &str,
        after: DateTime<Utc>,
    ) -> SchedulerResult<DateTime<Utc>>;
}

/// 配额服务
#[async_trait]
pub trait QuotaService: Send + Sync {
    async fn get_consumption(&self, role: &str) -> SchedulerResult<ResourceFigure>;
    async fn get_quota(&self, role: &str) -> SchedulerResult<ResourceFigure>;
}
