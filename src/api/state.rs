//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RateLimiter};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
///
/// Backends are optional so the router can run over in-memory services:
/// without a rate limiter requests are not throttled, and `/health` reports
/// a missing backend as disabled.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub database: Option<Arc<Database>>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    /// State over an already-built service container
    pub fn new(services: Arc<dyn ServiceContainer>) -> Self {
        Self {
            services,
            database: None,
            rate_limiter: None,
        }
    }

    /// Create application state backed by Postgres
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Services::from_connection(database.connection().clone(), config);
        Self::new(Arc::new(services)).with_database(database)
    }

    pub fn with_database(mut self, database: Arc<Database>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }
}
