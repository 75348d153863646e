use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, error, info, instrument, warn};

use scheduler_domain::entities::{CronJobSummary, JobSummary, RoleView};
use scheduler_domain::ports::{Clock, CronRegistry, QuotaService, TaskSource};
use scheduler_errors::SchedulerResult;

use super::cron_projector::CronProjector;
use super::job_aggregator::aggregate;

/// 作业排序：按作业名升序（作业名在同一视图内唯一）
pub fn job_ordering(a: &JobSummary, b: &JobSummary) -> Ordering {
    a.name.cmp(&b.name)
}

/// CRON作业排序：按作业名升序，名称相同时依次比较表达式与任务配置数
pub fn cron_job_ordering(a: &CronJobSummary, b: &CronJobSummary) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.cron_schedule.cmp(&b.cron_schedule))
        .then_with(|| a.pending_task_count.cmp(&b.pending_task_count))
}

/// 角色视图组装服务
///
/// 每次请求独立执行：查询任务并聚合、投影CRON作业、查询配额，最后按固定规则排序。
/// 服务本身不做重试，协作方的错误原样向上传递。
pub struct RoleViewService {
    cluster_name: String,
    task_source: Arc<dyn TaskSource>,
    quota_service: Arc<dyn QuotaService>,
    cron_registry: Arc<dyn CronRegistry>,
    cron_projector: CronProjector,
}

impl RoleViewService {
    pub fn new(
        cluster_name: impl Into<String>,
        task_source: Arc<dyn TaskSource>,
        cron_registry: Arc<dyn CronRegistry>,
        quota_service: Arc<dyn QuotaService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            task_source,
            quota_service,
            cron_projector: CronProjector::new(Arc::clone(&cron_registry), clock),
            cron_registry,
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// 构建角色视图
    ///
    /// 角色为空或只含空白时直接返回带提示信息的视图，不访问任何协作方；
    /// 其他角色按原样查询。
    #[instrument(skip(self), fields(cluster = %self.cluster_name))]
    pub async fn build_role_view(&self, role: Option<&str>) -> SchedulerResult<RoleView> {
        let Some(role) = role.filter(|r| !r.trim().is_empty()) else {
            debug!("请求未指定角色");
            return Ok(RoleView::missing_role(self.cluster_name.as_str()));
        };

        counter!("roleview_builds_total").increment(1);
        let start = Instant::now();
        let result = self.assemble(role).await;
        histogram!("roleview_build_duration_ms").record(start.elapsed().as_millis() as f64);

        match &result {
            Ok(view) => info!(
                role = %role,
                jobs = view.jobs.len(),
                cron_jobs = view.cron_jobs.len(),
                "角色视图构建完成"
            ),
            Err(e) => {
                counter!("roleview_build_failures_total").increment(1);
                if e.is_unavailable() {
                    warn!(role = %role, "依赖服务暂不可用，角色视图构建失败: {e}");
                } else {
                    error!(role = %role, "角色视图构建失败: {e}");
                }
            }
        }

        result
    }

    async fn assemble(&self, role: &str) -> SchedulerResult<RoleView> {
        let tasks = self.task_source.get_tasks_by_role(role).await?;
        debug!(role = %role, task_count = tasks.len(), "已获取角色任务");

        let mut jobs: Vec<JobSummary> = aggregate(&tasks)?.into_values().collect();
        jobs.sort_by(job_ordering);

        let cron_definitions = self.cron_registry.get_cron_jobs().await?;
        let mut cron_jobs = self.cron_projector.project(cron_definitions, role);
        cron_jobs.sort_by(cron_job_ordering);

        let resources_used = self.quota_service.get_consumption(role).await?;
        let resource_quota = self.quota_service.get_quota(role).await?;

        Ok(RoleView {
            cluster_name: self.cluster_name.clone(),
            role: Some(role.to_string()),
            error: None,
            jobs,
            cron_jobs,
            resources_used: Some(resources_used),
            resource_quota: Some(resource_quota),
        })
    }
}
