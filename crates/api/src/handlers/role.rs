use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

use scheduler_domain::entities::RoleView;

use crate::{
    error::ApiResult,
    response::{success, ApiResponse},
    routes::AppState,
};

/// 角色视图查询参数
#[derive(Debug, Deserialize)]
pub struct RoleQueryParams {
    pub role: Option<String>,
}

/// 获取角色视图
///
/// 未指定角色时仍返回 200，视图中带有提示信息；查询参数无法解析时返回 400。
pub async fn get_role_view(
    State(state): State<AppState>,
    query: Result<Query<RoleQueryParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = query?;
    let view = state
        .role_view_service
        .build_role_view(params.role.as_deref())
        .await?;
    Ok(render_role_view(view))
}

/// 渲染已构建完成的角色视图
pub fn render_role_view(view: RoleView) -> Response {
    match view.error.clone() {
        Some(message) => {
            debug!(cluster = %view.cluster_name, "渲染缺少角色的视图");
            ApiResponse::success_with_message(view, message).into_response()
        }
        None => success(view).into_response(),
    }
}
