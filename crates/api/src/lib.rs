//! # Scheduler RoleView API
//!
//! 角色视图的HTTP接口，基于Axum构建。
//!
//! ## API 端点
//!
//! - `GET /health` - 健康检查
//! - `GET /api/role?role=<role>` - 角色视图（作业计数、CRON作业、资源配额）
//! - `GET /metrics` - Prometheus 指标（启用指标时）
//!
//! 所有JSON响应使用统一的 [`response::ApiResponse`] 包装，错误响应由
//! [`error::ApiError`] 生成。

use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// HTTP层选项
#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub request_timeout: Duration,
    pub cors_enabled: bool,
    pub metrics_endpoint: String,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_enabled: true,
            metrics_endpoint: "/metrics".to_string(),
        }
    }
}

/// 创建完整的API应用
pub fn create_app(state: AppState, options: &ApiOptions) -> Router {
    let mut router = create_routes(state, &options.metrics_endpoint).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(TimeoutLayer::new(options.request_timeout))
            .layer(axum::middleware::from_fn(request_logging)),
    );

    if options.cors_enabled {
        router = router.layer(cors_layer());
    }

    router
}
