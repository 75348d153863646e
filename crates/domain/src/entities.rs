use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scheduler_errors::SchedulerError;

/// 未指定角色时视图携带的提示信息
pub const MISSING_ROLE_MESSAGE: &str = "Please specify a user.";

/// 任务生命周期状态
///
/// 与任务源的状态域一一对应。线上格式为大写名称（如 `RUNNING`），
/// 解析时不区分大小写。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Init,
    Pending,
    Assigned,
    Starting,
    Restarting,
    Updating,
    Running,
    Killing,
    Killed,
    Finished,
    Preempting,
    Rollback,
    Lost,
    Failed,
    Unknown,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 15] = [
        TaskStatus::Init,
        TaskStatus::Pending,
        TaskStatus::Assigned,
        TaskStatus::Starting,
        TaskStatus::Restarting,
        TaskStatus::Updating,
        TaskStatus::Running,
        TaskStatus::Killing,
        TaskStatus::Killed,
        TaskStatus::Finished,
        TaskStatus::Preempting,
        TaskStatus::Rollback,
        TaskStatus::Lost,
        TaskStatus::Failed,
        TaskStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Init => "INIT",
            TaskStatus::Pending => "PENDING",
            TaskStatus::Assigned => "ASSIGNED",
            TaskStatus::Starting => "STARTING",
            TaskStatus::Restarting => "RESTARTING",
            TaskStatus::Updating => "UPDATING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Killing => "KILLING",
            TaskStatus::Killed => "KILLED",
            TaskStatus::Finished => "FINISHED",
            TaskStatus::Preempting => "PREEMPTING",
            TaskStatus::Rollback => "ROLLBACK",
            TaskStatus::Lost => "LOST",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        TaskStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| SchedulerError::unsupported_status(s))
    }
}

/// 展示用的任务状态分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    Pending,
    Active,
    Finished,
    Failed,
}

/// 任务源返回的任务快照
///
/// `status` 保留任务源上报的原始状态字符串，由状态分类器负责解码。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task_id: String,
    pub role: String,
    pub job_name: String,
    pub status: String,
    #[serde(default)]
    pub resources: ResourceFigure,
}

impl ScheduledTask {
    pub fn new(
        task_id: impl Into<String>,
        role: impl Into<String>,
        job_name: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            role: role.into(),
            job_name: job_name.into(),
            status: status.into(),
            resources: ResourceFigure::zero(),
        }
    }

    pub fn with_resources(mut self, resources: ResourceFigure) -> Self {
        self.resources = resources;
        self
    }
}

/// CRON作业定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJobDefinition {
    pub owner_role: String,
    pub name: String,
    pub task_config_count: usize,
    pub cron_schedule: String,
}

impl CronJobDefinition {
    pub fn new(
        owner_role: impl Into<String>,
        name: impl Into<String>,
        task_config_count: usize,
        cron_schedule: impl Into<String>,
    ) -> Self {
        Self {
            owner_role: owner_role.into(),
            name: name.into(),
            task_config_count,
            cron_schedule: cron_schedule.into(),
        }
    }
}

/// 资源数值：既用于已消耗资源，也用于配额上限
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceFigure {
    pub num_cpus: f64,
    pub ram_mb: i64,
    pub disk_mb: i64,
}

impl ResourceFigure {
    pub fn new(num_cpus: f64, ram_mb: i64, disk_mb: i64) -> Self {
        Self {
            num_cpus,
            ram_mb,
            disk_mb,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

impl Add for ResourceFigure {
    type Output = ResourceFigure;

    fn add(self, rhs: ResourceFigure) -> ResourceFigure {
        ResourceFigure {
            num_cpus: self.num_cpus + rhs.num_cpus,
            ram_mb: self.ram_mb + rhs.ram_mb,
            disk_mb: self.disk_mb + rhs.disk_mb,
        }
    }
}

impl AddAssign for ResourceFigure {
    fn add_assign(&mut self, rhs: ResourceFigure) {
        *self = *self + rhs;
    }
}

/// 单个作业的任务计数汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    pub pending_task_count: usize,
    pub active_task_count: usize,
    pub finished_task_count: usize,
    pub failed_task_count: usize,
}

impl JobSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending_task_count: 0,
            active_task_count: 0,
            finished_task_count: 0,
            failed_task_count: 0,
        }
    }

    /// 计数只增不减
    pub fn record(&mut self, bucket: StatusBucket) {
        match bucket {
            StatusBucket::Pending => self.pending_task_count += 1,
            StatusBucket::Active => self.active_task_count += 1,
            StatusBucket::Finished => self.finished_task_count += 1,
            StatusBucket::Failed => self.failed_task_count += 1,
        }
    }

    pub fn count(&self, bucket: StatusBucket) -> usize {
        match bucket {
            StatusBucket::Pending => self.pending_task_count,
            StatusBucket::Active => self.active_task_count,
            StatusBucket::Finished => self.finished_task_count,
            StatusBucket::Failed => self.failed_task_count,
        }
    }

    pub fn total(&self) -> usize {
        self.pending_task_count
            + self.active_task_count
            + self.finished_task_count
            + self.failed_task_count
    }
}

/// CRON作业的下次执行时间推算结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NextRun {
    Scheduled { at: DateTime<Utc> },
    Invalid { reason: String },
}

impl NextRun {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            NextRun::Scheduled { at } => Some(*at),
            NextRun::Invalid { .. } => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, NextRun::Scheduled { .. })
    }
}

/// CRON作业汇总行，构造后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJobSummary {
    pub name: String,
    pub pending_task_count: usize,
    pub cron_schedule: String,
    pub next_run: NextRun,
}

/// 角色视图：一次请求的完整输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleView {
    pub cluster_name: String,
    pub role: Option<String>,
    pub error: Option<String>,
    pub jobs: Vec<JobSummary>,
    pub cron_jobs: Vec<CronJobSummary>,
    pub resources_used: Option<ResourceFigure>,
    pub resource_quota: Option<ResourceFigure>,
}

impl RoleView {
    /// 未指定角色时的视图，只包含集群名和提示信息
    pub fn missing_role(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            role: None,
            error: Some(MISSING_ROLE_MESSAGE.to_string()),
            jobs: Vec::new(),
            cron_jobs: Vec::new(),
            resources_used: None,
            resource_quota: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_task_status_parse_case_insensitive() {
        assert_eq!("RUNNING".parse::<TaskStatus>().unwrap(), TaskStatus::Running);
        assert_eq!("running".parse::<TaskStatus>().unwrap(), TaskStatus::Running);
        assert_eq!(" Lost ".parse::<TaskStatus>().unwrap(), TaskStatus::Lost);
    }

    #[test]
    fn test_task_status_parse_unknown_value() {
        let err = "SANDBOXED".parse::<TaskStatus>().unwrap_err();
        match err {
            SchedulerError::UnsupportedStatus { status } => assert_eq!(status, "SANDBOXED"),
            other => panic!("Expected UnsupportedStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_task_status_display_matches_wire_form() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_job_summary_record_and_total() {
        let mut summary = JobSummary::new("web");
        summary.record(StatusBucket::Pending);
        summary.record(StatusBucket::Active);
        summary.record(StatusBucket::Active);
        summary.record(StatusBucket::Failed);

        assert_eq!(summary.pending_task_count, 1);
        assert_eq!(summary.count(StatusBucket::Active), 2);
        assert_eq!(summary.finished_task_count, 0);
        assert_eq!(summary.failed_task_count, 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_resource_figure_addition() {
        let mut total = ResourceFigure::zero();
        total += ResourceFigure::new(0.5, 256, 1024);
        total += ResourceFigure::new(1.5, 768, 0);
        assert_eq!(total, ResourceFigure::new(2.0, 1024, 1024));
    }

    #[test]
    fn test_missing_role_view() {
        let view = RoleView::missing_role("smf1");
        assert_eq!(view.cluster_name, "smf1");
        assert_eq!(view.error.as_deref(), Some(MISSING_ROLE_MESSAGE));
        assert!(view.role.is_none());
        assert!(view.jobs.is_empty());
        assert!(view.cron_jobs.is_empty());
        assert!(view.resources_used.is_none());
        assert!(view.is_error());
    }

    #[test]
    fn test_next_run_serialization_is_tagged() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
        let json = serde_json::to_value(NextRun::Scheduled { at }).unwrap();
        assert_eq!(json["state"], "scheduled");
        assert_eq!(json["at"], "2024-01-01T13:00:00Z");

        let invalid = NextRun::Invalid {
            reason: "bad".to_string(),
        };
        let json = serde_json::to_value(&invalid).unwrap();
        assert_eq!(json["state"], "invalid");
        assert!(invalid.timestamp().is_none());
        assert!(!invalid.is_scheduled());
    }

    #[test]
    fn test_scheduled_task_deserialize_without_resources() {
        let task: ScheduledTask = serde_json::from_str(
            r#"{"task_id":"t-1","role":"eng","job_name":"web","status":"RUNNING"}"#,
        )
        .unwrap();
        assert_eq!(task.resources, ResourceFigure::zero());
        assert_eq!(task.status, "RUNNING");
    }
}
