//! Lead CRM - role-scoped sales lead tracking API
//!
//! Sales teams track leads through a status pipeline. Every request is
//! answered from the caller's visibility scope: sales members see their own
//! leads, managers see their team, admins see everything.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations (serve, migrate, seed)
//! - **config**: Application configuration and constants
//! - **domain**: Users, leads, roles and scope predicates
//! - **services**: Scope resolution, dashboard aggregation, lead mutation rules
//! - **infra**: Database, repositories and the Redis rate-limit store
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response envelopes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Load the demo fixture
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Identity, Lead, LeadStatus, Password, User, UserRole};
pub use errors::{AppError, AppResult};
