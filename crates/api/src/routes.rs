use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use scheduler_application::RoleViewService;

use crate::handlers::{health::health_check, metrics::prometheus_metrics, role::get_role_view};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub role_view_service: Arc<RoleViewService>,
    pub metrics_handle: Option<PrometheusHandle>,
}

/// 创建API路由，指标端点只在启用指标时注册
pub fn create_routes(state: AppState, metrics_endpoint: &str) -> Router {
    let mut router = Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 角色视图
        .route("/api/role", get(get_role_view));

    if state.metrics_handle.is_some() {
        router = router.route(metrics_endpoint, get(prometheus_metrics));
    }

    router.with_state(state)
}
