//! Infrastructure layer - External systems integration
//!
//! - Postgres connection, migrations and repositories
//! - Redis-backed rate limiting
//! - Unit of Work giving services one handle on every repository

pub mod db;
pub mod rate_limiter;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use rate_limiter::{RateLimitDecision, RateLimiter};
pub use repositories::{LeadRepository, LeadStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockLeadRepository, MockUserRepository};
