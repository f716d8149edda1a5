//! User service - profile, team listing and account deactivation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::scope;
use crate::domain::{Identity, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Result of deactivating an account
#[derive(Debug, Clone)]
pub struct Deactivation {
    pub user: User,
    /// Number of leads moved off the deactivated user
    pub reassigned: u64,
}

#[async_trait]
pub trait UserService: Send + Sync {
    /// The caller's own profile
    async fn me(&self, identity: Identity) -> AppResult<User>;

    /// Users visible to the caller, ordered by name
    async fn list(&self, identity: Identity) -> AppResult<Vec<User>>;

    /// Move the user's leads to `reassign_to` (or unassign them), then mark
    /// the user inactive. Admin only.
    async fn deactivate(
        &self,
        identity: Identity,
        id: Uuid,
        reassign_to: Option<Uuid>,
    ) -> AppResult<Deactivation>;

    /// Mark the user active again. Admin only.
    async fn activate(&self, identity: Identity, id: Uuid) -> AppResult<User>;
}

fn require_admin(identity: &Identity) -> AppResult<()> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn me(&self, identity: Identity) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(identity.user_id)
            .await?
            .ok_or_not_found()
    }

    async fn list(&self, identity: Identity) -> AppResult<Vec<User>> {
        self.uow.users().list(scope::user_scope(&identity)).await
    }

    async fn deactivate(
        &self,
        identity: Identity,
        id: Uuid,
        reassign_to: Option<Uuid>,
    ) -> AppResult<Deactivation> {
        require_admin(&identity)?;
        if id == identity.user_id {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        let users = self.uow.users();
        users.find_by_id(id).await?.ok_or_not_found()?;

        if let Some(target) = reassign_to {
            if target == id {
                return Err(AppError::invalid_field(
                    "reassignTo",
                    "Leads cannot be reassigned to the user being deactivated",
                ));
            }
            let receiver = users.find_by_id(target).await?;
            if !receiver.as_ref().map_or(false, User::can_receive_leads) {
                return Err(AppError::invalid_field(
                    "reassignTo",
                    "Leads can only be reassigned to an active sales manager or sales member",
                ));
            }
        }

        let reassigned = self.uow.leads().reassign(id, reassign_to).await?;
        let user = users.set_active(id, false).await?.ok_or_not_found()?;

        tracing::info!(
            user_id = %id,
            reassigned,
            reassign_to = ?reassign_to,
            "User deactivated"
        );

        Ok(Deactivation { user, reassigned })
    }

    async fn activate(&self, identity: Identity, id: Uuid) -> AppResult<User> {
        require_admin(&identity)?;

        let user = self.uow.users().set_active(id, true).await?.ok_or_not_found()?;
        tracing::info!(user_id = %id, "User activated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{MockLeadRepository, MockUserRepository};
    use crate::services::testing::MockUow;
    use mockall::predicate::eq;

    fn user(role: UserRole, is_active: bool) -> User {
        let mut user = User::new("Someone".into(), "someone@company.com".into(), "hash".into(), role);
        user.is_active = is_active;
        user
    }

    fn admin() -> Identity {
        Identity::new(Uuid::new_v4(), UserRole::Admin)
    }

    #[tokio::test]
    async fn test_non_admin_cannot_deactivate() {
        let svc = UserManager::new(Arc::new(MockUow::new(
            MockUserRepository::new(),
            MockLeadRepository::new(),
        )));
        let manager = Identity::new(Uuid::new_v4(), UserRole::SalesManager);

        let err = svc.deactivate(manager, Uuid::new_v4(), None).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_cannot_deactivate_self() {
        let svc = UserManager::new(Arc::new(MockUow::new(
            MockUserRepository::new(),
            MockLeadRepository::new(),
        )));
        let identity = admin();

        let err = svc
            .deactivate(identity, identity.user_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_deactivate_unassigns_leads() {
        let target = user(UserRole::SalesMember, true);
        let target_id = target.id;
        let deactivated = user(UserRole::SalesMember, false);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(target_id))
            .returning(move |_| Ok(Some(target.clone())));
        users
            .expect_set_active()
            .with(eq(target_id), eq(false))
            .times(1)
            .returning(move |_, _| Ok(Some(deactivated.clone())));

        let mut leads = MockLeadRepository::new();
        leads
            .expect_reassign()
            .with(eq(target_id), eq(None::<Uuid>))
            .times(1)
            .returning(|_, _| Ok(3));

        let svc = UserManager::new(Arc::new(MockUow::new(users, leads)));
        let result = svc.deactivate(admin(), target_id, None).await.unwrap();

        assert_eq!(result.reassigned, 3);
        assert!(!result.user.is_active);
    }

    #[tokio::test]
    async fn test_reassign_target_must_be_active_sales_staff() {
        let target = user(UserRole::SalesMember, true);
        let target_id = target.id;
        let receiver = user(UserRole::SalesMember, false);
        let receiver_id = receiver.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(target_id))
            .returning(move |_| Ok(Some(target.clone())));
        users
            .expect_find_by_id()
            .with(eq(receiver_id))
            .returning(move |_| Ok(Some(receiver.clone())));

        // No reassign expectation: the leads must stay untouched
        let svc = UserManager::new(Arc::new(MockUow::new(users, MockLeadRepository::new())));
        let err = svc
            .deactivate(admin(), target_id, Some(receiver_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "reassignTo"));
    }

    #[tokio::test]
    async fn test_activate_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_set_active().returning(|_, _| Ok(None));

        let svc = UserManager::new(Arc::new(MockUow::new(users, MockLeadRepository::new())));
        let err = svc.activate(admin(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
