//! Dashboard handler.

use axum::{extract::State, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::Identity;
use crate::errors::AppResult;
use crate::services::Dashboard;
use crate::types::ApiResponse;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// Dashboard statistics for the caller's scope
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Stats, lead distribution, recent leads and team", body = Dashboard),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<ApiResponse<Dashboard>> {
    let dashboard = state.services.dashboard().dashboard(identity).await?;
    Ok(ApiResponse::success(dashboard))
}
