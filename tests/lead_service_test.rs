//! Lead mutation gate and record scope tests over in-memory stores.

mod common;

use common::{identity, Store};
use lead_crm::domain::{CreateLead, LeadStatus, UpdateLead, UserRole};
use lead_crm::errors::AppError;
use lead_crm::services::ServiceContainer;
use uuid::Uuid;

fn create_request(company: &str) -> CreateLead {
    CreateLead {
        company: company.into(),
        contact: "Jo Buyer".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_member_created_lead_is_self_assigned() {
    let store = Store::new();
    let member = store.add_user("Alice Cole", UserRole::SalesMember);
    let other = store.add_user("Bob Johnson", UserRole::SalesMember);

    let mut request = create_request("Acme");
    request.assigned_to = Some(other.id);

    let lead = store
        .services()
        .leads()
        .create(identity(&member), request)
        .await
        .unwrap();

    assert_eq!(lead.assigned_to.unwrap().id, member.id);
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.last_activity, lead.created_at);
}

#[tokio::test]
async fn test_manager_may_assign_anyone() {
    let store = Store::new();
    let manager = store.add_user("Sales Manager", UserRole::SalesManager);
    let member = store.add_user("Bob Johnson", UserRole::SalesMember);

    let mut request = create_request("Acme");
    request.assigned_to = Some(member.id);

    let lead = store
        .services()
        .leads()
        .create(identity(&manager), request)
        .await
        .unwrap();

    assert_eq!(lead.assigned_to.unwrap().email, member.email);
}

#[tokio::test]
async fn test_create_rejects_blank_company() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);

    let err = store
        .services()
        .leads()
        .create(identity(&admin), create_request("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "company"));
    assert_eq!(store.leads.len(), 0);
}

#[tokio::test]
async fn test_member_lists_only_own_leads_manager_lists_all() {
    let store = Store::new();
    let manager = store.add_user("Sales Manager", UserRole::SalesManager);
    let member = store.add_user("Alice Cole", UserRole::SalesMember);
    let other = store.add_user("Bob Johnson", UserRole::SalesMember);

    store.add_lead("Mine", Some(member.id), LeadStatus::New, 0.0, 1);
    store.add_lead("Theirs", Some(other.id), LeadStatus::New, 0.0, 2);
    store.add_lead("Manager's", Some(manager.id), LeadStatus::New, 0.0, 3);
    store.add_lead("Nobody's", None, LeadStatus::New, 0.0, 4);

    let services = store.services();

    let mine = services.leads().list(identity(&member)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].company, "Mine");

    // The list is unrestricted for managers, unlike their dashboard
    let all = services.leads().list(identity(&manager)).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_member_cannot_read_or_update_foreign_lead() {
    let store = Store::new();
    let member = store.add_user("Alice Cole", UserRole::SalesMember);
    let other = store.add_user("Bob Johnson", UserRole::SalesMember);
    let foreign = store.add_lead("Theirs", Some(other.id), LeadStatus::New, 10.0, 1);

    let services = store.services();

    let err = services.leads().get(identity(&member), foreign.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFoundOrDenied));

    let update = UpdateLead {
        status: Some(LeadStatus::Won),
        ..Default::default()
    };
    let err = services
        .leads()
        .update(identity(&member), foreign.id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFoundOrDenied));

    // Unchanged
    assert_eq!(store.leads.get(foreign.id).unwrap().status, LeadStatus::New);
}

#[tokio::test]
async fn test_update_refreshes_activity_and_keeps_absent_fields() {
    let store = Store::new();
    let member = store.add_user("Alice Cole", UserRole::SalesMember);
    let lead = store.add_lead("Mine", Some(member.id), LeadStatus::New, 10.0, 60);

    let update = UpdateLead {
        status: Some(LeadStatus::Qualified),
        ..Default::default()
    };
    let updated = store
        .services()
        .leads()
        .update(identity(&member), lead.id, update)
        .await
        .unwrap();

    assert_eq!(updated.status, LeadStatus::Qualified);
    assert_eq!(updated.value, 10.0);
    assert_eq!(updated.company, "Mine");
    assert!(updated.last_activity > lead.last_activity);
    assert_eq!(updated.created_at, lead.created_at);
}

#[tokio::test]
async fn test_update_with_null_assignee_unassigns() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);
    let member = store.add_user("Alice Cole", UserRole::SalesMember);
    let lead = store.add_lead("Mine", Some(member.id), LeadStatus::New, 10.0, 5);

    let update: UpdateLead = serde_json::from_value(serde_json::json!({"assignedTo": null})).unwrap();
    let updated = store
        .services()
        .leads()
        .update(identity(&admin), lead.id, update)
        .await
        .unwrap();

    assert!(updated.assigned_to.is_none());
    assert_eq!(store.leads.get(lead.id).unwrap().assigned_to, None);
}

#[tokio::test]
async fn test_update_to_unknown_assignee_is_rejected() {
    let store = Store::new();
    let admin = store.add_user("Admin User", UserRole::Admin);
    let lead = store.add_lead("Mine", None, LeadStatus::New, 10.0, 5);

    let update = UpdateLead {
        assigned_to: Some(Some(Uuid::new_v4())),
        ..Default::default()
    };
    let err = store
        .services()
        .leads()
        .update(identity(&admin), lead.id, update)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "assignedTo"));
}

#[tokio::test]
async fn test_member_delete_is_forbidden_even_for_missing_lead() {
    let store = Store::new();
    let member = store.add_user("Alice Cole", UserRole::SalesMember);
    let own = store.add_lead("Mine", Some(member.id), LeadStatus::New, 0.0, 1);

    let services = store.services();

    let err = services.leads().delete(identity(&member), own.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = services
        .leads()
        .delete(identity(&member), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    assert_eq!(store.leads.len(), 1);
}

#[tokio::test]
async fn test_manager_delete() {
    let store = Store::new();
    let manager = store.add_user("Sales Manager", UserRole::SalesManager);
    let lead = store.add_lead("Doomed", None, LeadStatus::Lost, 0.0, 1);

    let services = store.services();
    services.leads().delete(identity(&manager), lead.id).await.unwrap();
    assert_eq!(store.leads.len(), 0);

    let err = services
        .leads()
        .delete(identity(&manager), lead.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}
