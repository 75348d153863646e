use std::sync::Arc;

use metrics::counter;
use tracing::warn;

use scheduler_domain::entities::{CronJobDefinition, CronJobSummary, NextRun};
use scheduler_domain::ports::{Clock, CronRegistry};

/// CRON作业投影
///
/// 过滤出属于指定角色的CRON作业定义，并通过注册表推算每个作业的下次执行时间。
/// 单个表达式解析失败只影响该行，其余行照常输出。
pub struct CronProjector {
    registry: Arc<dyn CronRegistry>,
    clock: Arc<dyn Clock>,
}

impl CronProjector {
    pub fn new(registry: Arc<dyn CronRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    pub fn project(&self, cron_jobs: Vec<CronJobDefinition>, role: &str) -> Vec<CronJobSummary> {
        let now = self.clock.now();

        cron_jobs
            .into_iter()
            .filter(|job| job.owner_role == role)
            .map(|job| {
                let next_run = match self.registry.predict_next_run(&job.cron_schedule, now) {
                    Ok(at) => NextRun::Scheduled { at },
                    Err(e) => {
                        warn!(
                            role = %role,
                            cron_job = %job.name,
                            cron_schedule = %job.cron_schedule,
                            "无法推算CRON作业的下次执行时间: {e}"
                        );
                        counter!("roleview_cron_projection_failures_total").increment(1);
                        NextRun::Invalid {
                            reason: e.to_string(),
                        }
                    }
                };

                CronJobSummary {
                    name: job.name,
                    pending_task_count: job.task_config_count,
                    cron_schedule: job.cron_schedule,
                    next_run,
                }
            })
            .collect()
    }
}
