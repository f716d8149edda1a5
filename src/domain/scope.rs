//! Visibility predicates over leads and users.
//!
//! Scopes are plain values: the stores translate them into SQL conditions,
//! and `matches` evaluates the same predicate in memory.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Lead, LeadStatus, User, UserRole};

/// Which leads an identity may see
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LeadScope {
    /// No restriction
    #[default]
    All,
    /// Leads assigned to exactly this user
    AssignedTo(Uuid),
    /// Leads assigned to any of these users; an empty set matches nothing
    AssignedToAny(Vec<Uuid>),
}

impl LeadScope {
    pub fn matches(&self, lead: &Lead) -> bool {
        match self {
            LeadScope::All => true,
            LeadScope::AssignedTo(user_id) => lead.assigned_to == Some(*user_id),
            LeadScope::AssignedToAny(user_ids) => lead
                .assigned_to
                .map_or(false, |assignee| user_ids.contains(&assignee)),
        }
    }
}

/// A scope narrowed by optional id, status and creation-time constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub scope: LeadScope,
    pub id: Option<Uuid>,
    pub status: Option<LeadStatus>,
    pub created_since: Option<DateTime<Utc>>,
}

impl LeadFilter {
    pub fn scoped(scope: LeadScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created_since(mut self, since: DateTime<Utc>) -> Self {
        self.created_since = Some(since);
        self
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        self.scope.matches(lead)
            && self.id.map_or(true, |id| lead.id == id)
            && self.status.map_or(true, |status| lead.status == status)
            && self
                .created_since
                .map_or(true, |since| lead.created_at >= since)
    }
}

/// Which users an identity may list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserScope {
    /// Only the caller
    Only(Uuid),
    /// Active users holding one of these roles
    ActiveWithRoles(Vec<UserRole>),
}

impl UserScope {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserScope::Only(user_id) => user.id == *user_id,
            UserScope::ActiveWithRoles(roles) => user.is_active && roles.contains(&user.role),
        }
    }
}
