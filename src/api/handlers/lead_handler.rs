//! Lead handlers.

use axum::{
    extract::State,
    routing::get,
    Extension, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{PathId, ValidatedJson};
use crate::api::AppState;
use crate::domain::{CreateLead, Identity, LeadResponse, UpdateLead};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoBody};

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadsBody {
    pub leads: Vec<LeadResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadBody {
    pub lead: LeadResponse,
}

pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leads).post(create_lead))
        .route(
            "/:id",
            get(get_lead).put(update_lead).delete(delete_lead),
        )
}

/// List leads visible to the caller
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Leads, most recent activity first", body = LeadsBody),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<ApiResponse<LeadsBody>> {
    let leads = state.services.leads().list(identity).await?;
    Ok(ApiResponse::success(LeadsBody { leads }))
}

/// Get a single lead
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Lead found", body = LeadBody),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Lead not found or access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_lead(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    PathId(id): PathId,
) -> AppResult<ApiResponse<LeadBody>> {
    let lead = state.services.leads().get(identity, id).await?;
    Ok(ApiResponse::success(LeadBody { lead }))
}

/// Create a lead
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLead,
    responses(
        (status = 201, description = "Lead created", body = LeadBody),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_lead(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<CreateLead>,
) -> AppResult<Created<LeadBody>> {
    let lead = state.services.leads().create(identity, payload).await?;
    Ok(Created(ApiResponse::with_message(
        LeadBody { lead },
        "Lead created successfully",
    )))
}

/// Update a lead
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "Lead ID")),
    request_body = UpdateLead,
    responses(
        (status = 200, description = "Lead updated", body = LeadBody),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Lead not found or access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_lead(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    PathId(id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateLead>,
) -> AppResult<ApiResponse<LeadBody>> {
    let lead = state.services.leads().update(identity, id, payload).await?;
    Ok(ApiResponse::with_message(
        LeadBody { lead },
        "Lead updated successfully",
    ))
}

/// Delete a lead (managers and admins only)
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Lead deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Sales members cannot delete leads"),
        (status = 404, description = "Lead not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_lead(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    PathId(id): PathId,
) -> AppResult<ApiResponse<NoBody>> {
    state.services.leads().delete(identity, id).await?;
    Ok(ApiResponse::message("Lead deleted successfully"))
}
