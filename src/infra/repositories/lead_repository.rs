//! Lead repository implementation.
//!
//! Every read and write goes through a [`LeadFilter`], so the scope a
//! service resolved is applied in SQL rather than after the fact.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, UpdateMany,
};
use uuid::Uuid;

use super::entities::lead::{self, ActiveModel, Entity as LeadEntity};
use crate::domain::{Lead, LeadChanges, LeadFilter, LeadScope};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Leads matching `filter`, most recent activity first
    async fn find(&self, filter: LeadFilter, limit: Option<u64>) -> AppResult<Vec<Lead>>;

    /// First lead matching `filter`
    async fn find_one(&self, filter: LeadFilter) -> AppResult<Option<Lead>>;

    async fn count(&self, filter: LeadFilter) -> AppResult<u64>;

    /// Sum of `value` over matching leads; 0 when nothing matches
    async fn sum_value(&self, filter: LeadFilter) -> AppResult<f64>;

    async fn insert(&self, lead: Lead) -> AppResult<Lead>;

    /// Apply `changes` to the lead matching `filter`. `None` when no lead
    /// matches, which callers cannot distinguish from "not permitted".
    async fn update_one(
        &self,
        filter: LeadFilter,
        changes: LeadChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Lead>>;

    /// Delete by id. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Move every lead assigned to `from` onto `to` (or unassign them).
    /// Returns the number of leads touched.
    async fn reassign(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64>;
}

/// Concrete implementation of LeadRepository
pub struct LeadStore {
    db: DatabaseConnection,
}

impl LeadStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate a lead filter into a SQL condition
fn filter_condition(filter: &LeadFilter) -> Condition {
    let mut condition = Condition::all();

    condition = match &filter.scope {
        LeadScope::All => condition,
        LeadScope::AssignedTo(user_id) => condition.add(lead::Column::AssignedTo.eq(*user_id)),
        // `IN ()` is not portable; an empty set is an explicit false
        LeadScope::AssignedToAny(user_ids) if user_ids.is_empty() => {
            condition.add(Expr::val(1).eq(0))
        }
        LeadScope::AssignedToAny(user_ids) => {
            condition.add(lead::Column::AssignedTo.is_in(user_ids.iter().copied()))
        }
    };

    if let Some(id) = filter.id {
        condition = condition.add(lead::Column::Id.eq(id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(lead::Column::Status.eq(status.as_str()));
    }
    if let Some(since) = filter.created_since {
        condition = condition.add(lead::Column::CreatedAt.gte(since));
    }

    condition
}

/// One `UPDATE` setting only the supplied columns, restricted by `filter`.
///
/// The scope check and the write happen in the same statement, and columns
/// the caller did not touch are never rewritten.
fn scoped_update(
    filter: &LeadFilter,
    changes: LeadChanges,
    now: DateTime<Utc>,
) -> UpdateMany<LeadEntity> {
    let mut update = LeadEntity::update_many();

    if let Some(company) = changes.company {
        update = update.col_expr(lead::Column::Company, Expr::value(company));
    }
    if let Some(contact) = changes.contact {
        update = update.col_expr(lead::Column::Contact, Expr::value(contact));
    }
    if let Some(email) = changes.email {
        update = update.col_expr(lead::Column::Email, Expr::value(email));
    }
    if let Some(phone) = changes.phone {
        update = update.col_expr(lead::Column::Phone, Expr::value(phone));
    }
    if let Some(status) = changes.status {
        update = update.col_expr(lead::Column::Status, Expr::value(status.as_str()));
    }
    if let Some(value) = changes.value {
        update = update.col_expr(lead::Column::Value, Expr::value(value));
    }
    if let Some(priority) = changes.priority {
        update = update.col_expr(lead::Column::Priority, Expr::value(priority.as_str()));
    }
    if let Some(source) = changes.source {
        update = update.col_expr(lead::Column::Source, Expr::value(source.as_str()));
    }
    if let Some(assigned_to) = changes.assigned_to {
        update = update.col_expr(lead::Column::AssignedTo, Expr::value(assigned_to));
    }
    if let Some(notes) = changes.notes {
        update = update.col_expr(lead::Column::Notes, Expr::value(notes));
    }

    update
        .col_expr(lead::Column::LastActivity, Expr::value(now))
        .col_expr(lead::Column::UpdatedAt, Expr::value(now))
        .filter(filter_condition(filter))
}

#[async_trait]
impl LeadRepository for LeadStore {
    async fn find(&self, filter: LeadFilter, limit: Option<u64>) -> AppResult<Vec<Lead>> {
        let mut query = LeadEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(lead::Column::LastActivity);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Lead::try_from)
            .collect()
    }

    async fn find_one(&self, filter: LeadFilter) -> AppResult<Option<Lead>> {
        LeadEntity::find()
            .filter(filter_condition(&filter))
            .one(&self.db)
            .await?
            .map(Lead::try_from)
            .transpose()
    }

    async fn count(&self, filter: LeadFilter) -> AppResult<u64> {
        let total = LeadEntity::find()
            .filter(filter_condition(&filter))
            .count(&self.db)
            .await?;
        Ok(total)
    }

    async fn sum_value(&self, filter: LeadFilter) -> AppResult<f64> {
        let sum: Option<Option<f64>> = LeadEntity::find()
            .select_only()
            .column_as(lead::Column::Value.sum(), "total")
            .filter(filter_condition(&filter))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(sum.flatten().unwrap_or(0.0))
    }

    async fn insert(&self, lead: Lead) -> AppResult<Lead> {
        let active_model: ActiveModel = lead.into();
        let model = active_model.insert(&self.db).await?;
        Lead::try_from(model)
    }

    async fn update_one(
        &self,
        filter: LeadFilter,
        changes: LeadChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Lead>> {
        // Only ever called with an id in the filter, so at most one row
        scoped_update(&filter, changes, now)
            .exec_with_returning(&self.db)
            .await?
            .into_iter()
            .next()
            .map(Lead::try_from)
            .transpose()
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = LeadEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn reassign(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64> {
        let now = Utc::now();
        let result = LeadEntity::update_many()
            .col_expr(lead::Column::AssignedTo, Expr::value(to))
            .col_expr(lead::Column::UpdatedAt, Expr::value(now))
            .filter(lead::Column::AssignedTo.eq(from))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(filter: LeadFilter) -> String {
        LeadEntity::find()
            .filter(filter_condition(&filter))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_unrestricted_scope_has_no_where_clause() {
        assert!(!sql(LeadFilter::default()).contains("WHERE"));
    }

    #[test]
    fn test_empty_assignee_set_is_false() {
        let query = sql(LeadFilter::scoped(LeadScope::AssignedToAny(vec![])));
        assert!(query.contains("1 = 0"));
    }

    #[test]
    fn test_assignee_set_uses_in() {
        let id = Uuid::new_v4();
        let query = sql(LeadFilter::scoped(LeadScope::AssignedToAny(vec![id])));
        assert!(query.contains("\"assigned_to\" IN"));
        assert!(query.contains(&id.to_string()));
    }

    fn update_sql(filter: LeadFilter, changes: LeadChanges) -> String {
        scoped_update(&filter, changes, Utc::now())
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_update_sets_only_supplied_columns() {
        let id = Uuid::new_v4();
        let changes = LeadChanges {
            status: Some(crate::domain::LeadStatus::Won),
            ..Default::default()
        };
        let query = update_sql(LeadFilter::default().with_id(id), changes);

        assert!(query.contains("\"status\" = 'won'"));
        assert!(query.contains("\"last_activity\" ="));
        assert!(query.contains("\"updated_at\" ="));
        assert!(!query.contains("\"company\""));
        assert!(!query.contains("\"assigned_to\""));
        assert!(!query.contains("\"value\""));
    }

    #[test]
    fn test_update_is_restricted_by_scope() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let filter = LeadFilter::scoped(LeadScope::AssignedTo(owner)).with_id(id);
        let query = update_sql(filter, LeadChanges::default());

        let (_, predicate) = query.split_once("WHERE").unwrap();
        assert!(predicate.contains(&owner.to_string()));
        assert!(predicate.contains(&id.to_string()));
    }

    #[test]
    fn test_update_can_clear_assignee() {
        let changes = LeadChanges {
            assigned_to: Some(None),
            ..Default::default()
        };
        let query = update_sql(LeadFilter::default().with_id(Uuid::new_v4()), changes);
        assert!(query.contains("\"assigned_to\" = NULL"));
    }

    #[test]
    fn test_status_filter() {
        let query = sql(LeadFilter::default().with_status(crate::domain::LeadStatus::Won));
        assert!(query.contains("\"status\" = 'won'"));
    }
}
