use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scheduler_errors::SchedulerError;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("调度器错误: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("请求参数错误: {0}")]
    BadRequest(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, &'static str, Vec<String>) {
        match self {
            ApiError::Scheduler(err @ SchedulerError::UnsupportedStatus { status }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("任务状态 '{status}' 无法归类"),
                "INTERNAL_ERROR",
                vec![
                    err.user_message().to_string(),
                    "任务源上报了未知的任务状态".to_string(),
                    "请确认角色视图服务与调度器版本一致".to_string(),
                ],
            ),
            ApiError::Scheduler(err @ SchedulerError::CollaboratorUnavailable { service, message }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("依赖服务 {service} 不可用: {message}"),
                "SERVICE_UNAVAILABLE",
                vec![err.user_message().to_string()],
            ),
            ApiError::Scheduler(err @ SchedulerError::Snapshot(msg)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("调度器状态不可用: {msg}"),
                "STATE_UNAVAILABLE",
                vec![
                    err.user_message().to_string(),
                    "请检查快照文件是否存在且格式正确".to_string(),
                ],
            ),
            ApiError::Scheduler(err @ SchedulerError::InvalidCron { expr, message }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Cron表达式 '{expr}' 无效: {message}"),
                "INVALID_CRON_EXPRESSION",
                vec![
                    err.user_message().to_string(),
                    "请使用标准的Cron表达式格式".to_string(),
                ],
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                format!("请求参数错误: {msg}"),
                "BAD_REQUEST",
                vec!["请检查请求参数是否符合要求".to_string()],
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_type, suggestions) = self.parts();

        if status.is_server_error() {
            error!(error_type, "请求处理失败: {self}");
        }

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type,
                "code": status.as_u16(),
                "suggestions": suggestions,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
