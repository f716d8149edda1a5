//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers reach every use case through [`ServiceContainer`], which hands
//! out trait objects so the router can be built over in-memory fakes.

use std::future::Future;
use std::sync::Arc;

use super::{AuthService, DashboardService, LeadService, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn leads(&self) -> Arc<dyn LeadService>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    lead_service: Arc<dyn LeadService>,
    dashboard_service: Arc<dyn DashboardService>,
}

impl Services {
    /// Build every service over a single Unit of Work
    pub fn from_uow<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        use super::{Authenticator, DashboardAggregator, LeadManager, UserManager};

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            lead_service: Arc::new(LeadManager::new(uow.clone())),
            dashboard_service: Arc::new(DashboardAggregator::new(uow)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_uow(Arc::new(Persistence::new(db)), config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn leads(&self) -> Arc<dyn LeadService> {
        self.lead_service.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;

    /// Execute operations in parallel with a concurrency limit.
    ///
    /// Results keep the order of the input futures. The first error aborts
    /// the remaining work.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        stream::iter(futures)
            .map(Ok)
            .try_buffered(limit.max(1))
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_join_all_limited_keeps_order() {
        let futures = (0..6u64).map(|i| async move {
            // Later items finish first
            tokio::time::sleep(Duration::from_millis(30 - i * 5)).await;
            Ok(i) as AppResult<u64>
        });

        let results = parallel::join_all_limited(futures, 3).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_join_all_limited_propagates_error() {
        let futures = (0..4).map(|i| async move {
            if i == 2 {
                Err(AppError::internal("boom"))
            } else {
                Ok(i)
            }
        });

        assert!(parallel::join_all_limited(futures, 2).await.is_err());
    }
}
