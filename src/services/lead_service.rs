//! Lead service - scoped reads and the mutation gate.
//!
//! Reads and updates are filtered by the caller's record scope. A lead
//! outside that scope is indistinguishable from a missing one.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::scope;
use crate::domain::{
    AssigneeSummary, CreateLead, Identity, Lead, LeadFilter, LeadResponse, UpdateLead, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserRepository};

#[async_trait]
pub trait LeadService: Send + Sync {
    /// Visible leads, most recent activity first
    async fn list(&self, identity: Identity) -> AppResult<Vec<LeadResponse>>;

    async fn get(&self, identity: Identity, id: Uuid) -> AppResult<LeadResponse>;

    /// Sales members always own the leads they create
    async fn create(&self, identity: Identity, input: CreateLead) -> AppResult<LeadResponse>;

    async fn update(&self, identity: Identity, id: Uuid, input: UpdateLead)
        -> AppResult<LeadResponse>;

    /// Sales members may never delete, whether or not the lead exists
    async fn delete(&self, identity: Identity, id: Uuid) -> AppResult<()>;
}

/// Expand each lead's assignee into an id/name/email summary.
///
/// A dangling reference renders as no assignee.
pub(crate) async fn with_assignees(
    users: &dyn UserRepository,
    leads: Vec<Lead>,
) -> AppResult<Vec<LeadResponse>> {
    let mut ids: Vec<Uuid> = leads.iter().filter_map(|l| l.assigned_to).collect();
    ids.sort_unstable();
    ids.dedup();

    let assignees: HashMap<Uuid, AssigneeSummary> = users
        .find_by_ids(ids)
        .await?
        .iter()
        .map(|u| (u.id, AssigneeSummary::from(u)))
        .collect();

    Ok(leads
        .into_iter()
        .map(|lead| {
            let assignee = lead.assigned_to.and_then(|id| assignees.get(&id).cloned());
            LeadResponse::new(lead, assignee)
        })
        .collect())
}

/// Concrete implementation of LeadService using Unit of Work.
pub struct LeadManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> LeadManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn expand(&self, lead: Lead) -> AppResult<LeadResponse> {
        let mut expanded = with_assignees(self.uow.users().as_ref(), vec![lead]).await?;
        expanded
            .pop()
            .ok_or_else(|| AppError::internal("assignee expansion dropped a lead"))
    }

    async fn ensure_assignee_exists(&self, assignee: Option<Uuid>) -> AppResult<()> {
        let Some(id) = assignee else {
            return Ok(());
        };

        match self.uow.users().find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::invalid_field(
                "assignedTo",
                "Assigned user does not exist",
            )),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> LeadService for LeadManager<U> {
    async fn list(&self, identity: Identity) -> AppResult<Vec<LeadResponse>> {
        let filter = LeadFilter::scoped(scope::record_scope(&identity));
        let leads = self.uow.leads().find(filter, None).await?;
        with_assignees(self.uow.users().as_ref(), leads).await
    }

    async fn get(&self, identity: Identity, id: Uuid) -> AppResult<LeadResponse> {
        let filter = LeadFilter::scoped(scope::record_scope(&identity)).with_id(id);
        let lead = self
            .uow
            .leads()
            .find_one(filter)
            .await?
            .ok_or(AppError::NotFoundOrDenied)?;

        self.expand(lead).await
    }

    async fn create(&self, identity: Identity, input: CreateLead) -> AppResult<LeadResponse> {
        let assigned_to = match identity.role {
            UserRole::SalesMember => Some(identity.user_id),
            UserRole::SalesManager | UserRole::Admin => input.assigned_to,
        };
        let lead = input.into_lead(assigned_to, Utc::now())?;
        self.ensure_assignee_exists(lead.assigned_to).await?;

        let lead = self.uow.leads().insert(lead).await?;

        tracing::info!(lead_id = %lead.id, created_by = %identity.user_id, "Lead created");

        self.expand(lead).await
    }

    async fn update(
        &self,
        identity: Identity,
        id: Uuid,
        input: UpdateLead,
    ) -> AppResult<LeadResponse> {
        let changes = input.into_changes()?;
        if let Some(assignee) = changes.assigned_to {
            self.ensure_assignee_exists(assignee).await?;
        }

        let filter = LeadFilter::scoped(scope::record_scope(&identity)).with_id(id);
        let Some(lead) = self.uow.leads().update_one(filter, changes, Utc::now()).await? else {
            tracing::warn!(lead_id = %id, user_id = %identity.user_id, "Lead update denied or missing");
            return Err(AppError::NotFoundOrDenied);
        };

        self.expand(lead).await
    }

    async fn delete(&self, identity: Identity, id: Uuid) -> AppResult<()> {
        match identity.role {
            UserRole::SalesMember => {
                tracing::warn!(lead_id = %id, user_id = %identity.user_id, "Lead delete denied");
                return Err(AppError::Forbidden);
            }
            UserRole::SalesManager | UserRole::Admin => {}
        }

        if !self.uow.leads().delete(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(lead_id = %id, deleted_by = %identity.user_id, "Lead deleted");
        Ok(())
    }
}
