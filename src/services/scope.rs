//! Access-scope resolution.
//!
//! Turns an [`Identity`] into the predicate values the stores filter on.
//! Every function matches on [`UserRole`] exhaustively.

use crate::domain::{Identity, LeadScope, UserRole, UserScope};
use crate::errors::AppResult;
use crate::infra::UserRepository;

/// Leads an identity sees on the dashboard.
///
/// A manager only sees leads held by active sales members; leads assigned
/// to other managers, admins or deactivated members are excluded.
pub async fn dashboard_lead_scope(
    identity: &Identity,
    users: &dyn UserRepository,
) -> AppResult<LeadScope> {
    let scope = match identity.role {
        UserRole::SalesMember => LeadScope::AssignedTo(identity.user_id),
        UserRole::SalesManager => {
            let members = users
                .list(UserScope::ActiveWithRoles(vec![UserRole::SalesMember]))
                .await?;
            LeadScope::AssignedToAny(members.into_iter().map(|u| u.id).collect())
        }
        UserRole::Admin => LeadScope::All,
    };

    Ok(scope)
}

/// Leads an identity may list, read and update.
///
/// Managers are unrestricted here even though their dashboard is not.
pub fn record_scope(identity: &Identity) -> LeadScope {
    match identity.role {
        UserRole::SalesMember => LeadScope::AssignedTo(identity.user_id),
        UserRole::SalesManager | UserRole::Admin => LeadScope::All,
    }
}

/// Users an identity may list.
pub fn user_scope(identity: &Identity) -> UserScope {
    match identity.role {
        UserRole::SalesMember => UserScope::Only(identity.user_id),
        UserRole::SalesManager => UserScope::ActiveWithRoles(vec![UserRole::SalesMember]),
        UserRole::Admin => {
            UserScope::ActiveWithRoles(vec![UserRole::SalesManager, UserRole::SalesMember])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn member(name: &str) -> User {
        User::new(
            name.into(),
            format!("{}@company.com", name.to_lowercase()),
            "hash".into(),
            UserRole::SalesMember,
        )
    }

    #[tokio::test]
    async fn test_member_sees_own_leads() {
        let identity = Identity::new(Uuid::new_v4(), UserRole::SalesMember);
        let users = MockUserRepository::new();

        let scope = dashboard_lead_scope(&identity, &users).await.unwrap();
        assert_eq!(scope, LeadScope::AssignedTo(identity.user_id));
        assert_eq!(record_scope(&identity), scope);
    }

    #[tokio::test]
    async fn test_manager_dashboard_covers_active_members() {
        let identity = Identity::new(Uuid::new_v4(), UserRole::SalesManager);
        let alice = member("Alice");
        let bob = member("Bob");
        let expected = vec![alice.id, bob.id];

        let mut users = MockUserRepository::new();
        users
            .expect_list()
            .with(eq(UserScope::ActiveWithRoles(vec![UserRole::SalesMember])))
            .times(1)
            .returning(move |_| Ok(vec![alice.clone(), bob.clone()]));

        let scope = dashboard_lead_scope(&identity, &users).await.unwrap();
        assert_eq!(scope, LeadScope::AssignedToAny(expected));
        assert_eq!(record_scope(&identity), LeadScope::All);
    }

    #[tokio::test]
    async fn test_manager_without_members_sees_nothing() {
        let identity = Identity::new(Uuid::new_v4(), UserRole::SalesManager);
        let mut users = MockUserRepository::new();
        users.expect_list().returning(|_| Ok(vec![]));

        let scope = dashboard_lead_scope(&identity, &users).await.unwrap();
        assert_eq!(scope, LeadScope::AssignedToAny(vec![]));
    }

    #[tokio::test]
    async fn test_admin_is_unrestricted() {
        let identity = Identity::new(Uuid::new_v4(), UserRole::Admin);
        let users = MockUserRepository::new();

        let scope = dashboard_lead_scope(&identity, &users).await.unwrap();
        assert_eq!(scope, LeadScope::All);
        assert_eq!(
            user_scope(&identity),
            UserScope::ActiveWithRoles(vec![UserRole::SalesManager, UserRole::SalesMember])
        );
    }

    #[test]
    fn test_member_user_scope_is_self() {
        let identity = Identity::new(Uuid::new_v4(), UserRole::SalesMember);
        assert_eq!(user_scope(&identity), UserScope::Only(identity.user_id));
    }
}
