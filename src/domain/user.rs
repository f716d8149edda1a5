//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_SALES_MANAGER, ROLE_SALES_MEMBER};
use crate::errors::AppError;

/// User roles enumeration.
///
/// Closed set: every scope, gate and aggregation rule matches on it
/// exhaustively, so a new role is a compile error until each rule handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    SalesManager,
    SalesMember,
}

impl UserRole {
    /// Stored / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::SalesManager => ROLE_SALES_MANAGER,
            UserRole::SalesMember => ROLE_SALES_MEMBER,
        }
    }

    /// Label shown on dashboard team listings
    pub fn display_label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::SalesManager => "Sales Manager",
            UserRole::SalesMember => "Sales Rep",
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Roles that can own leads and appear on team listings
    pub fn is_sales_staff(&self) -> bool {
        matches!(self, UserRole::SalesManager | UserRole::SalesMember)
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_SALES_MANAGER => Ok(UserRole::SalesManager),
            ROLE_SALES_MEMBER => Ok(UserRole::SalesMember),
            other => Err(AppError::invalid_field(
                "role",
                format!("unknown role `{}`", other),
            )),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this user may take over leads from a deactivated colleague
    pub fn can_receive_leads(&self) -> bool {
        self.is_active && self.role.is_sales_staff()
    }
}

/// Assignee projection embedded in lead responses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AssigneeSummary {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Alice Cole")]
    pub name: String,
    #[schema(example = "alice@company.com")]
    pub email: String,
}

impl From<&User> for AssigneeSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "Alice Cole")]
    pub name: String,
    /// User email address
    #[schema(example = "alice@company.com")]
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Whether the account may sign in and own leads
    pub is_active: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [UserRole::Admin, UserRole::SalesManager, UserRole::SalesMember] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "user".parse::<UserRole>().unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "role"));
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(UserRole::SalesManager.display_label(), "Sales Manager");
        assert_eq!(UserRole::SalesMember.display_label(), "Sales Rep");
    }

    #[test]
    fn test_can_receive_leads() {
        let mut user = User::new(
            "Bob".into(),
            "bob@company.com".into(),
            "hash".into(),
            UserRole::SalesMember,
        );
        assert!(user.can_receive_leads());

        user.is_active = false;
        assert!(!user.can_receive_leads());

        let admin = User::new("Root".into(), "root@company.com".into(), "hash".into(), UserRole::Admin);
        assert!(!admin.can_receive_leads());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("Bob".into(), "bob@company.com".into(), "secret-hash".into(), UserRole::SalesMember);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
