use std::collections::HashMap;

use tracing::error;

use scheduler_domain::entities::{JobSummary, ScheduledTask};
use scheduler_errors::SchedulerResult;

use super::status_classifier::classify;

/// 按作业名聚合任务计数
///
/// 单次遍历任务列表：首次遇到的作业名创建汇总，随后按状态分组累加。
/// 结果不保证顺序，排序由视图组装负责。遇到无法识别的状态立即中止。
pub fn aggregate(tasks: &[ScheduledTask]) -> SchedulerResult<HashMap<String, JobSummary>> {
    let mut jobs: HashMap<String, JobSummary> = HashMap::new();

    for task in tasks {
        let bucket = classify(&task.status).inspect_err(|e| {
            error!(
                task_id = %task.task_id,
                job_name = %task.job_name,
                "任务状态无法分类: {e}"
            );
        })?;

        jobs.entry(task.job_name.clone())
            .or_insert_with(|| JobSummary::new(task.job_name.as_str()))
            .record(bucket);
    }

    Ok(jobs)
}
