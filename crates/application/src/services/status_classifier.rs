use scheduler_domain::entities::{StatusBucket, TaskStatus};
use scheduler_errors::SchedulerResult;

/// 任务状态到展示分组的映射
///
/// 分组沿用运维约定：KILLING/KILLED/PREEMPTING/ROLLBACK 计为已结束，
/// UNKNOWN 与 LOST/FAILED 一同计为失败。
pub fn bucket_of(status: TaskStatus) -> StatusBucket {
    match status {
        TaskStatus::Init | TaskStatus::Pending => StatusBucket::Pending,

        TaskStatus::Assigned
        | TaskStatus::Starting
        | TaskStatus::Restarting
        | TaskStatus::Updating
        | TaskStatus::Running => StatusBucket::Active,

        TaskStatus::Killing
        | TaskStatus::Killed
        | TaskStatus::Finished
        | TaskStatus::Preempting
        | TaskStatus::Rollback => StatusBucket::Finished,

        TaskStatus::Lost | TaskStatus::Failed | TaskStatus::Unknown => StatusBucket::Failed,
    }
}

/// 对任务源上报的原始状态进行分类
///
/// 状态不在已知集合内时返回 `UnsupportedStatus`，调用方不得降级为任何分组。
pub fn classify(status: &str) -> SchedulerResult<StatusBucket> {
    let status: TaskStatus = status.parse()?;
    Ok(bucket_of(status))
}
