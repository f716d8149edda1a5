//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, dashboard_handler, lead_handler, user_handler};
use crate::domain::{
    AssigneeSummary, CreateLead, LeadPriority, LeadResponse, LeadSource, LeadStatus, UpdateLead,
    UserResponse, UserRole,
};
use crate::services::{Dashboard, DashboardStats, LeadDistribution, TeamMember, TokenResponse};

/// OpenAPI documentation for the Lead CRM API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lead CRM API",
        version = "0.1.0",
        description = "Role-scoped sales lead tracking with dashboards and team administration",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Dashboard
        dashboard_handler::get_stats,
        // Leads
        lead_handler::list_leads,
        lead_handler::get_lead,
        lead_handler::create_lead,
        lead_handler::update_lead,
        lead_handler::delete_lead,
        // Users
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::deactivate_user,
        user_handler::activate_user,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            AssigneeSummary,
            LeadStatus,
            LeadPriority,
            LeadSource,
            LeadResponse,
            CreateLead,
            UpdateLead,
            // Dashboard
            Dashboard,
            DashboardStats,
            LeadDistribution,
            TeamMember,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthBody,
            TokenResponse,
            // Envelopes
            lead_handler::LeadBody,
            lead_handler::LeadsBody,
            user_handler::UserBody,
            user_handler::UsersBody,
            user_handler::DeactivateRequest,
            user_handler::DeactivateBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Dashboard", description = "Role-scoped lead statistics"),
        (name = "Leads", description = "Lead records"),
        (name = "Users", description = "Team listing and administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
