//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They reach the stores through a Unit of Work and
//! are exposed to handlers as trait objects.

mod auth_service;
pub mod container;
mod dashboard_service;
mod lead_service;
pub mod scope;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, Registration, Session, TokenResponse};
pub use dashboard_service::{
    percentage, Dashboard, DashboardAggregator, DashboardService, DashboardStats,
    LeadDistribution, TeamMember,
};
pub use lead_service::{LeadManager, LeadService};
pub use user_service::{Deactivation, UserManager, UserService};

// Parallel execution utilities
pub use container::parallel;
