use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use scheduler_application::{classify, CronScheduler};
use scheduler_domain::entities::{
    CronJobDefinition, ResourceFigure, ScheduledTask, StatusBucket,
};
use scheduler_domain::ports::{CronRegistry, QuotaService, TaskSource};
use scheduler_errors::{SchedulerError, SchedulerResult};

use crate::snapshot::SchedulerSnapshot;

/// 基于快照的内存调度器状态
///
/// 请求只读取快照；`reload` 整体替换快照，不会出现半新半旧的状态。
#[derive(Debug, Clone)]
pub struct InMemorySchedulerStore {
    snapshot: Arc<RwLock<SchedulerSnapshot>>,
    source_path: Option<PathBuf>,
}

impl InMemorySchedulerStore {
    pub fn new(snapshot: SchedulerSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            source_path: None,
        }
    }

    pub async fn from_snapshot_file(path: impl AsRef<Path>) -> SchedulerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = SchedulerSnapshot::load(&path).await?;
        info!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            cron_jobs = snapshot.cron_jobs.len(),
            "从快照文件初始化调度器状态"
        );
        Ok(Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            source_path: Some(path),
        })
    }

    /// 重新读取快照文件；读取失败时保留当前快照
    pub async fn reload(&self) -> SchedulerResult<()> {
        let Some(path) = self.source_path.as_deref() else {
            return Err(SchedulerError::Snapshot(
                "当前状态不是从快照文件加载的，无法重新加载".to_string(),
            ));
        };

        match SchedulerSnapshot::load(path).await {
            Ok(snapshot) => {
                self.replace(snapshot).await;
                info!(path = %path.display(), "快照已重新加载");
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), "重新加载快照失败，继续使用旧快照: {e}");
                Err(e)
            }
        }
    }

    pub async fn replace(&self, snapshot: SchedulerSnapshot) {
        *self.snapshot.write().await = snapshot;
    }
}

#[async_trait]
impl TaskSource for InMemorySchedulerStore {
    async fn get_tasks_by_role(&self, role: &str) -> SchedulerResult<Vec<ScheduledTask>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .tasks
            .iter()
            .filter(|task| task.role == role)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CronRegistry for InMemorySchedulerStore {
    async fn get_cron_jobs(&self) -> SchedulerResult<Vec<CronJobDefinition>> {
        Ok(self.snapshot.read().await.cron_jobs.clone())
    }

    fn predict_next_run(
        &self,
        cron_schedule: &str,
        after: DateTime<Utc>,
    ) -> SchedulerResult<DateTime<Utc>> {
        CronScheduler::predict_next_run(cron_schedule, after)
    }
}

#[async_trait]
impl QuotaService for InMemorySchedulerStore {
    /// 角色下处于等待或活跃分组的任务所占资源之和
    async fn get_consumption(&self, role: &str) -> SchedulerResult<ResourceFigure> {
        let snapshot = self.snapshot.read().await;
        let mut consumed = ResourceFigure::zero();
        for task in snapshot.tasks.iter().filter(|task| task.role == role) {
            match classify(&task.status)? {
                StatusBucket::Pending | StatusBucket::Active => consumed += task.resources,
                StatusBucket::Finished | StatusBucket::Failed => {}
            }
        }
        Ok(consumed)
    }

    async fn get_quota(&self, role: &str) -> SchedulerResult<ResourceFigure> {
        Ok(self
            .snapshot
            .read()
            .await
            .quotas
            .get(role)
            .copied()
            .unwrap_or_default())
    }
}
