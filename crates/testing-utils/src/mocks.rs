//! Mock implementations for the collaborator ports
//!
//! In-memory test doubles that record how they were called and can be told
//! to fail, so that view assembly can be tested without a snapshot file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scheduler_domain::entities::{CronJobDefinition, ResourceFigure, ScheduledTask};
use scheduler_domain::ports::{CronRegistry, QuotaService, TaskSource};
use scheduler_errors::{SchedulerError, SchedulerResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock implementation of TaskSource for testing
#[derive(Debug, Clone, Default)]
pub struct MockTaskSource {
    tasks: Arc<Mutex<Vec<ScheduledTask>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<ScheduledTask>) -> Self {
        let source = Self::new();
        *source.tasks.lock().unwrap() = tasks;
        source
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// 被查询过的角色，按调用顺序
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskSource for MockTaskSource {
    async fn get_tasks_by_role(&self, role: &str) -> SchedulerResult<Vec<ScheduledTask>> {
        self.calls.lock().unwrap().push(role.to_string());
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(SchedulerError::unavailable("task_source", message.as_str()));
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|task| task.role == role)
            .cloned()
            .collect())
    }
}

/// Mock implementation of CronRegistry for testing
///
/// Schedules without a registered projection are reported as unparseable.
#[derive(Debug, Clone, Default)]
pub struct MockCronRegistry {
    definitions: Arc<Mutex<Vec<CronJobDefinition>>>,
    projections: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    failure: Arc<Mutex<Option<String>>>,
    list_calls: Arc<Mutex<usize>>,
    prediction_requests: Arc<Mutex<Vec<(String, DateTime<Utc>)>>>,
}

impl MockCronRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions(self, definitions: Vec<CronJobDefinition>) -> Self {
        *self.definitions.lock().unwrap() = definitions;
        self
    }

    pub fn with_projection(self, cron_schedule: &str, next_run: DateTime<Utc>) -> Self {
        self.projections
            .lock()
            .unwrap()
            .insert(cron_schedule.to_string(), next_run);
        self
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn prediction_requests(&self) -> Vec<(String, DateTime<Utc>)> {
        self.prediction_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CronRegistry for MockCronRegistry {
    async fn get_cron_jobs(&self) -> SchedulerResult<Vec<CronJobDefinition>> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(SchedulerError::unavailable("cron_registry", message.as_str()));
        }
        Ok(self.definitions.lock().unwrap().clone())
    }

    fn predict_next_run(
        &self,
        cron_schedule: &str,
        after: DateTime<Utc>,
    ) -> SchedulerResult<DateTime<Utc>> {
        self.prediction_requests
            .lock()
            .unwrap()
            .push((cron_schedule.to_string(), after));
        self.projections
            .lock()
            .unwrap()
            .get(cron_schedule)
            .copied()
            .ok_or_else(|| SchedulerError::invalid_cron(cron_schedule, "mock: no projection"))
    }
}

/// Mock implementation of QuotaService for testing
#[derive(Debug, Clone, Default)]
pub struct MockQuotaService {
    consumption: Arc<Mutex<HashMap<String, ResourceFigure>>>,
    quotas: Arc<Mutex<HashMap<String, ResourceFigure>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockQuotaService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_figures(self, role: &str, consumption: ResourceFigure, quota: ResourceFigure) -> Self {
        self.consumption
            .lock()
            .unwrap()
            .insert(role.to_string(), consumption);
        self.quotas.lock().unwrap().insert(role.to_string(), quota);
        self
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn lookup(
        &self,
        figures: &Mutex<HashMap<String, ResourceFigure>>,
        role: &str,
    ) -> SchedulerResult<ResourceFigure> {
        *self.calls.lock().unwrap() += 1;
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(SchedulerError::unavailable("quota_service", message.as_str()));
        }
        Ok(figures
            .lock()
            .unwrap()
            .get(role)
            .copied()
            .unwrap_or_default())
    }
}

#[async_trait]
impl QuotaService for MockQuotaService {
    async fn get_consumption(&self, role: &str) -> SchedulerResult<ResourceFigure> {
        self.lookup(&self.consumption, role)
    }

    async fn get_quota(&self, role: &str) -> SchedulerResult<ResourceFigure> {
        self.lookup(&self.quotas, role)
    }
}
