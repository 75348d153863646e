use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("不支持的任务状态: {status}")]
    UnsupportedStatus { status: String },
    #[error("无效的CRON表达式: {expr} - {message}")]
    InvalidCron { expr: String, message: String },
    #[error("依赖服务不可用: {service} - {message}")]
    CollaboratorUnavailable { service: String, message: String },
    #[error("快照加载错误: {0}")]
    Snapshot(String),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

impl SchedulerError {
    pub fn unsupported_status<S: Into<String>>(status: S) -> Self {
        Self::UnsupportedStatus {
            status: status.into(),
        }
    }
    pub fn invalid_cron<E: Into<String>, M: Into<String>>(expr: E, message: M) -> Self {
        Self::InvalidCron {
            expr: expr.into(),
            message: message.into(),
        }
    }
    pub fn unavailable<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::CollaboratorUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SchedulerError::CollaboratorUnavailable { .. })
    }
    pub fn user_message(&self) -> &str {
        match self {
            SchedulerError::InvalidCron { .. } => "CRON表达式无法解析",
            SchedulerError::CollaboratorUnavailable { .. } => "调度器数据暂不可用，请稍后重试",
            SchedulerError::Snapshot(_) => "调度器状态暂不可用，请稍后重试",
            SchedulerError::UnsupportedStatus { .. } => "系统繁忙，请稍后重试",
        }
    }
}
