//! HTTP request handlers.

pub mod auth_handler;
pub mod dashboard_handler;
pub mod lead_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use dashboard_handler::dashboard_routes;
pub use lead_handler::lead_routes;
pub use user_handler::user_routes;
