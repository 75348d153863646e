use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use scheduler_domain::entities::{CronJobDefinition, ResourceFigure, ScheduledTask};
use scheduler_errors::{SchedulerError, SchedulerResult};

/// 调度器状态快照
///
/// ```json
/// {
///   "tasks": [{"task_id": "t-1", "role": "eng", "job_name": "web", "status": "RUNNING",
///              "resources": {"num_cpus": 1.0, "ram_mb": 512, "disk_mb": 1024}}],
///   "cron_jobs": [{"owner_role": "eng", "name": "report", "task_config_count": 1,
///                  "cron_schedule": "0 * * * *"}],
///   "quotas": {"eng": {"num_cpus": 10.0, "ram_mb": 16384, "disk_mb": 65536}}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    #[serde(default)]
    pub tasks: Vec<ScheduledTask>,
    #[serde(default)]
    pub cron_jobs: Vec<CronJobDefinition>,
    #[serde(default)]
    pub quotas: HashMap<String, ResourceFigure>,
}

impl SchedulerSnapshot {
    pub fn from_json(content: &str) -> SchedulerResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| SchedulerError::Snapshot(format!("解析快照失败: {e}")))
    }

    pub async fn load(path: &Path) -> SchedulerResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            SchedulerError::Snapshot(format!("读取快照文件失败 {}: {e}", path.display()))
        })?;
        let snapshot = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            cron_jobs = snapshot.cron_jobs.len(),
            quotas = snapshot.quotas.len(),
            "快照已加载"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_with_missing_sections() {
        let snapshot = SchedulerSnapshot::from_json(r#"{"tasks": []}"#).unwrap();
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.cron_jobs.is_empty());
        assert!(snapshot.quotas.is_empty());
    }

    #[test]
    fn test_from_json_full() {
        let snapshot = SchedulerSnapshot::from_json(
            r#"{
                "tasks": [{"task_id": "t-1", "role": "eng", "job_name": "web", "status": "RUNNING",
                           "resources": {"num_cpus": 1.0, "ram_mb": 512, "disk_mb": 1024}}],
                "cron_jobs": [{"owner_role": "eng", "name": "report", "task_config_count": 2,
                               "cron_schedule": "0 * * * *"}],
                "quotas": {"eng": {"num_cpus": 10.0, "ram_mb": 16384, "disk_mb": 65536}}
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].resources, ResourceFigure::new(1.0, 512, 1024));
        assert_eq!(snapshot.cron_jobs[0].task_config_count, 2);
        assert_eq!(snapshot.quotas["eng"].ram_mb, 16384);
    }

    #[test]
    fn test_from_json_malformed() {
        let result = SchedulerSnapshot::from_json("{not json");
        assert!(matches!(result, Err(SchedulerError::Snapshot(_))));
    }
}
