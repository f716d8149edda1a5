//! Account deactivation and team listing over in-memory stores.

mod common;

use common::{identity, Store};
use lead_crm::domain::{LeadStatus, UserRole};
use lead_crm::errors::AppError;
use lead_crm::services::{Registration, ServiceContainer};

#[tokio::test]
async fn test_deactivate_reassigns_leads() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);
    let leaving = store.add_user("Alice Cole", UserRole::SalesMember);
    let staying = store.add_user("Bob Johnson", UserRole::SalesMember);

    let first = store.add_lead("One", Some(leaving.id), LeadStatus::New, 0.0, 1);
    let second = store.add_lead("Two", Some(leaving.id), LeadStatus::Won, 10.0, 2);
    let untouched = store.add_lead("Three", Some(staying.id), LeadStatus::New, 0.0, 3);

    let result = store
        .services()
        .users()
        .deactivate(identity(&admin), leaving.id, Some(staying.id))
        .await
        .unwrap();

    assert_eq!(result.reassigned, 2);
    assert!(!result.user.is_active);
    assert_eq!(store.leads.get(first.id).unwrap().assigned_to, Some(staying.id));
    assert_eq!(store.leads.get(second.id).unwrap().assigned_to, Some(staying.id));
    assert_eq!(store.leads.get(untouched.id).unwrap().assigned_to, Some(staying.id));
}

#[tokio::test]
async fn test_deactivate_without_target_unassigns() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);
    let leaving = store.add_user("Alice Cole", UserRole::SalesMember);
    let lead = store.add_lead("One", Some(leaving.id), LeadStatus::New, 0.0, 1);

    let result = store
        .services()
        .users()
        .deactivate(identity(&admin), leaving.id, None)
        .await
        .unwrap();

    assert_eq!(result.reassigned, 1);
    assert_eq!(store.leads.get(lead.id).unwrap().assigned_to, None);
}

#[tokio::test]
async fn test_deactivate_rejects_inactive_target() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);
    let leaving = store.add_user("Alice Cole", UserRole::SalesMember);
    let former = store.add_inactive_user("Carl Former", UserRole::SalesMember);
    let lead = store.add_lead("One", Some(leaving.id), LeadStatus::New, 0.0, 1);

    let err = store
        .services()
        .users()
        .deactivate(identity(&admin), leaving.id, Some(former.id))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "reassignTo"));
    assert_eq!(store.leads.get(lead.id).unwrap().assigned_to, Some(leaving.id));
}

#[tokio::test]
async fn test_deactivated_member_drops_out_of_manager_view() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);
    let manager = store.add_user("Sales Manager", UserRole::SalesManager);
    let leaving = store.add_user("Alice Cole", UserRole::SalesMember);
    store.add_user("Bob Johnson", UserRole::SalesMember);

    let services = store.services();
    assert_eq!(services.users().list(identity(&manager)).await.unwrap().len(), 2);

    services
        .users()
        .deactivate(identity(&admin), leaving.id, None)
        .await
        .unwrap();

    let team = services.users().list(identity(&manager)).await.unwrap();
    assert_eq!(team.len(), 1);
    assert_eq!(team[0].name, "Bob Johnson");

    services.users().activate(identity(&admin), leaving.id).await.unwrap();
    assert_eq!(services.users().list(identity(&manager)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_member_lists_only_self() {
    let store = Store::new();
    let member = store.add_user("Alice Cole", UserRole::SalesMember);
    store.add_user("Bob Johnson", UserRole::SalesMember);

    let users = store.services().users().list(identity(&member)).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, member.id);
}

#[tokio::test]
async fn test_register_then_login() {
    let store = Store::new();
    let services = store.services();

    let registration = Registration {
        name: "New Person".into(),
        email: "  New.Person@Company.com ".into(),
        password: "password123".into(),
        role: UserRole::SalesMember,
    };
    let session = services.auth().register(registration).await.unwrap();
    assert_eq!(session.user.email, "new.person@company.com");

    let login = services
        .auth()
        .login("new.person@company.com".into(), "password123".into())
        .await
        .unwrap();
    assert_eq!(login.user.id, session.user.id);

    let claims = services.auth().verify_token(&login.token.access_token).unwrap();
    assert_eq!(claims.sub, session.user.id);
}

#[tokio::test]
async fn test_login_rejected_after_deactivation() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);
    let services = store.services();

    let session = services
        .auth()
        .register(Registration {
            name: "Leaving Soon".into(),
            email: "leaving@company.com".into(),
            password: "password123".into(),
            role: UserRole::SalesMember,
        })
        .await
        .unwrap();

    services
        .users()
        .deactivate(identity(&admin), session.user.id, None)
        .await
        .unwrap();

    let err = services
        .auth()
        .login("leaving@company.com".into(), "password123".into())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}
