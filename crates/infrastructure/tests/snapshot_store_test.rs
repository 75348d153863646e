use std::io::Write;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::NamedTempFile;

use scheduler_application::RoleViewService;
use scheduler_domain::entities::{NextRun, ResourceFigure};
use scheduler_domain::ports::{FixedClock, TaskSource};
use scheduler_errors::SchedulerError;
use scheduler_infrastructure::InMemorySchedulerStore;

const SNAPSHOT: &str = r#"{
    "tasks": [
        {"task_id": "t-1", "role": "eng", "job_name": "web", "status": "RUNNING",
         "resources": {"num_cpus": 1.0, "ram_mb": 1024, "disk_mb": 2048}},
        {"task_id": "t-2", "role": "eng", "job_name": "web", "status": "PENDING",
         "resources": {"num_cpus": 0.5, "ram_mb": 512, "disk_mb": 512}},
        {"task_id": "t-3", "role": "eng", "job_name": "batch", "status": "FAILED"},
        {"task_id": "t-4", "role": "ops", "job_name": "db", "status": "RUNNING"}
    ],
    "cron_jobs": [
        {"owner_role": "eng", "name": "hourly_report", "task_config_count": 3,
         "cron_schedule": "0 * * * *"},
        {"owner_role": "eng", "name": "broken", "task_config_count": 1,
         "cron_schedule": "not a schedule"},
        {"owner_role": "ops", "name": "vacuum", "task_config_count": 1,
         "cron_schedule": "0 3 * * *"}
    ],
    "quotas": {
        "eng": {"num_cpus": 10.0, "ram_mb": 16384, "disk_mb": 65536}
    }
}"#;

fn write_snapshot(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn service(store: InMemorySchedulerStore) -> RoleViewService {
    let store = Arc::new(store);
    RoleViewService::new(
        "smf1",
        store.clone(),
        store.clone(),
        store,
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap(),
        )),
    )
}

#[tokio::test]
async fn test_role_view_from_snapshot_file() {
    let file = write_snapshot(SNAPSHOT);
    let store = InMemorySchedulerStore::from_snapshot_file(file.path())
        .await
        .unwrap();
    let view = service(store).build_role_view(Some("eng")).await.unwrap();

    let names: Vec<&str> = view.jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, vec!["batch", "web"]);
    assert_eq!(view.jobs[0].failed_task_count, 1);
    assert_eq!(view.jobs[1].pending_task_count, 1);
    assert_eq!(view.jobs[1].active_task_count, 1);

    assert_eq!(view.cron_jobs.len(), 2);
    assert_eq!(view.cron_jobs[0].name, "broken");
    assert!(matches!(view.cron_jobs[0].next_run, NextRun::Invalid { .. }));
    assert_eq!(view.cron_jobs[1].name, "hourly_report");
    assert_eq!(view.cron_jobs[1].pending_task_count, 3);
    assert_eq!(
        view.cron_jobs[1].next_run,
        NextRun::Scheduled {
            at: Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap()
        }
    );

    assert_eq!(view.resources_used, Some(ResourceFigure::new(1.5, 1536, 2560)));
    assert_eq!(
        view.resource_quota,
        Some(ResourceFigure::new(10.0, 16384, 65536))
    );
}

#[tokio::test]
async fn test_role_without_quota_entry_gets_zero_quota() {
    let file = write_snapshot(SNAPSHOT);
    let store = InMemorySchedulerStore::from_snapshot_file(file.path())
        .await
        .unwrap();
    let view = service(store).build_role_view(Some("ops")).await.unwrap();

    assert_eq!(view.jobs.len(), 1);
    assert_eq!(view.cron_jobs.len(), 1);
    assert_eq!(view.resource_quota, Some(ResourceFigure::zero()));
}

#[tokio::test]
async fn test_reload_picks_up_new_snapshot() {
    let file = write_snapshot(SNAPSHOT);
    let store = InMemorySchedulerStore::from_snapshot_file(file.path())
        .await
        .unwrap();
    assert_eq!(store.get_tasks_by_role("eng").await.unwrap().len(), 3);

    std::fs::write(
        file.path(),
        r#"{"tasks": [{"task_id": "t-9", "role": "eng", "job_name": "web", "status": "KILLED"}]}"#,
    )
    .unwrap();
    store.reload().await.unwrap();

    let eng = store.get_tasks_by_role("eng").await.unwrap();
    assert_eq!(eng.len(), 1);
    assert_eq!(eng[0].task_id, "t-9");
    assert!(store.get_tasks_by_role("ops").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_snapshot() {
    let file = write_snapshot(SNAPSHOT);
    let store = InMemorySchedulerStore::from_snapshot_file(file.path())
        .await
        .unwrap();

    std::fs::write(file.path(), "{ truncated").unwrap();
    let result = store.reload().await;

    assert!(matches!(result, Err(SchedulerError::Snapshot(_))));
    assert_eq!(store.get_tasks_by_role("eng").await.unwrap().len(), 3);
    assert_eq!(store.get_tasks_by_role("ops").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_snapshot_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let result = InMemorySchedulerStore::from_snapshot_file(dir.path().join("absent.json")).await;
    assert!(matches!(result, Err(SchedulerError::Snapshot(_))));
}
