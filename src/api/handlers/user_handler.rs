//! User handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::PathId;
use crate::api::AppState;
use crate::domain::{Identity, UserResponse};
use crate::errors::AppResult;
use crate::types::ApiResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserBody {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersBody {
    pub users: Vec<UserResponse>,
}

/// Deactivation request; without `reassignTo` the user's leads are unassigned
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateRequest {
    pub reassign_to: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeactivateBody {
    pub user: UserResponse,
    /// Number of leads moved off the user
    pub reassigned: u64,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/:id/deactivate", post(deactivate_user))
        .route("/:id/activate", post(activate_user))
}

/// Get current user profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserBody),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<ApiResponse<UserBody>> {
    let user = state.services.users().me(identity).await?;
    Ok(ApiResponse::success(UserBody { user: user.into() }))
}

/// List the caller's team
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Users visible to the caller, by name", body = UsersBody),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<ApiResponse<UsersBody>> {
    let users = state.services.users().list(identity).await?;
    Ok(ApiResponse::success(UsersBody {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// Deactivate a user (admin only)
#[utoipa::path(
    post,
    path = "/api/users/{id}/deactivate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body(content = DeactivateRequest, description = "Optional reassignment target"),
    responses(
        (status = 200, description = "User deactivated", body = DeactivateBody),
        (status = 400, description = "Invalid reassignment target or self-deactivation"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    PathId(id): PathId,
    payload: Option<Json<DeactivateRequest>>,
) -> AppResult<ApiResponse<DeactivateBody>> {
    let Json(payload) = payload.unwrap_or_default();
    let result = state
        .services
        .users()
        .deactivate(identity, id, payload.reassign_to)
        .await?;

    Ok(ApiResponse::with_message(
        DeactivateBody {
            user: result.user.into(),
            reassigned: result.reassigned,
        },
        "User deactivated successfully",
    ))
}

/// Reactivate a user (admin only)
#[utoipa::path(
    post,
    path = "/api/users/{id}/activate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User activated", body = UserBody),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    PathId(id): PathId,
) -> AppResult<ApiResponse<UserBody>> {
    let user = state.services.users().activate(identity, id).await?;
    Ok(ApiResponse::success(UserBody { user: user.into() }))
}
