//! Test data builders for creating test entities

use scheduler_domain::entities::{CronJobDefinition, ResourceFigure, ScheduledTask};

/// Builder for creating test ScheduledTask entities
pub struct TaskBuilder {
    task: ScheduledTask,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self {
            task: ScheduledTask::new("task-1", "eng", "test_job", "PENDING"),
        }
    }

    pub fn with_id(mut self, task_id: &str) -> Self {
        self.task.task_id = task_id.to_string();
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.task.role = role.to_string();
        self
    }

    pub fn with_job(mut self, job_name: &str) -> Self {
        self.task.job_name = job_name.to_string();
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.task.status = status.to_string();
        self
    }

    pub fn with_resources(mut self, num_cpus: f64, ram_mb: i64, disk_mb: i64) -> Self {
        self.task.resources = ResourceFigure::new(num_cpus, ram_mb, disk_mb);
        self
    }

    pub fn build(self) -> ScheduledTask {
        self.task
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test CronJobDefinition entities
pub struct CronJobBuilder {
    job: CronJobDefinition,
}

impl CronJobBuilder {
    pub fn new() -> Self {
        Self {
            job: CronJobDefinition::new("eng", "test_cron_job", 1, "0 * * * *"),
        }
    }

    pub fn with_owner(mut self, owner_role: &str) -> Self {
        self.job.owner_role = owner_role.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.job.name = name.to_string();
        self
    }

    pub fn with_task_config_count(mut self, count: usize) -> Self {
        self.job.task_config_count = count;
        self
    }

    pub fn with_schedule(mut self, schedule: &str) -> Self {
        self.job.cron_schedule = schedule.to_string();
        self
    }

    pub fn build(self) -> CronJobDefinition {
        self.job
    }
}

impl Default for CronJobBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 快速构造一组同角色任务：`(作业名, 状态)`
pub fn tasks_for_role(role: &str, entries: &[(&str, &str)]) -> Vec<ScheduledTask> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (job, status))| {
            TaskBuilder::new()
                .with_id(&format!("{role}-{job}-{i}"))
                .with_role(role)
                .with_job(job)
                .with_status(status)
                .build()
        })
        .collect()
}
