//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories so services depend on a single
//! handle instead of wiring each store separately.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{LeadRepository, LeadStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
///
/// Writes that span both aggregates (deactivating a user and moving their
/// leads) are issued as separate statements; there is no cross-repository
/// transaction.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get lead repository
    fn leads(&self) -> Arc<dyn LeadRepository>;
}

/// Concrete implementation of UnitOfWork backed by Postgres
pub struct Persistence {
    user_repo: Arc<UserStore>,
    lead_repo: Arc<LeadStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            lead_repo: Arc::new(LeadStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn leads(&self) -> Arc<dyn LeadRepository> {
        self.lead_repo.clone()
    }
}
