//! Lead domain entity, its closed enumerations and write payloads.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use super::AssigneeSummary;
use crate::errors::{AppError, AppResult};

/// Declares a closed, string-backed enumeration. Parsing an unknown value
/// fails with a validation error naming `$field`.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal, default = $default:ident) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored / wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(AppError::invalid_field(
                        $field,
                        format!(
                            "`{}` is not a valid {}; expected one of: {}",
                            other,
                            $field,
                            [$($value),+].join(", ")
                        ),
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// Pipeline stage of a lead
    LeadStatus("status", default = New) {
        New => "new",
        Qualified => "qualified",
        Proposal => "proposal",
        Won => "won",
        Lost => "lost",
    }
}

closed_enum! {
    LeadPriority("priority", default = Medium) {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

closed_enum! {
    /// Channel the lead came in through
    LeadSource("source", default = Website) {
        Website => "website",
        Referral => "referral",
        SocialMedia => "social_media",
        Event => "event",
        ColdOutreach => "cold_outreach",
        Other => "other",
    }
}

/// Lead domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: Uuid,
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub value: f64,
    pub priority: LeadPriority,
    pub source: LeadSource,
    /// Non-owning reference to a user
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Apply a validated partial update. Always refreshes `last_activity`.
    pub fn apply(&mut self, changes: LeadChanges, now: DateTime<Utc>) {
        if let Some(company) = changes.company {
            self.company = company;
        }
        if let Some(contact) = changes.contact {
            self.contact = contact;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(value) = changes.value {
            self.value = value;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(source) = changes.source {
            self.source = source;
        }
        if let Some(assigned_to) = changes.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(notes) = changes.notes {
            self.notes = notes;
        }
        self.last_activity = now;
        self.updated_at = now;
    }

    pub fn is_won(&self) -> bool {
        self.status == LeadStatus::Won
    }
}

/// Validated partial update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadChanges {
    pub company: Option<String>,
    pub contact: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    pub value: Option<f64>,
    pub priority: Option<LeadPriority>,
    pub source: Option<LeadSource>,
    pub assigned_to: Option<Option<Uuid>>,
    pub notes: Option<Option<String>>,
}

/// Lead creation payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLead {
    #[validate(length(max = 255, message = "Company is too long"))]
    #[schema(example = "Tech Innovations Inc")]
    pub company: String,
    #[validate(length(max = 255, message = "Contact is too long"))]
    #[schema(example = "John Smith")]
    pub contact: String,
    #[schema(example = "john@techinnovations.com")]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "Phone is too long"))]
    #[schema(example = "+1-555-0123")]
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    #[validate(range(min = 0.0, message = "Value must not be negative"))]
    #[schema(example = 25000.0)]
    pub value: Option<f64>,
    pub priority: Option<LeadPriority>,
    pub source: Option<LeadSource>,
    /// Ignored for sales members, who always own the leads they create
    pub assigned_to: Option<Uuid>,
    #[validate(length(max = 5000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl CreateLead {
    /// Normalize and validate into a new lead owned by `assigned_to`.
    pub fn into_lead(self, assigned_to: Option<Uuid>, now: DateTime<Utc>) -> AppResult<Lead> {
        Ok(Lead {
            id: Uuid::new_v4(),
            company: required_text("company", &self.company)?,
            contact: required_text("contact", &self.contact)?,
            email: normalize_email(self.email)?,
            phone: optional_text(self.phone),
            status: self.status.unwrap_or_default(),
            value: check_value(self.value.unwrap_or(0.0))?,
            priority: self.priority.unwrap_or_default(),
            source: self.source.unwrap_or_default(),
            assigned_to,
            notes: optional_text(self.notes),
            last_activity: now,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Lead update payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLead {
    #[validate(length(max = 255, message = "Company is too long"))]
    pub company: Option<String>,
    #[validate(length(max = 255, message = "Contact is too long"))]
    pub contact: Option<String>,
    pub email: Option<String>,
    #[validate(length(max = 255, message = "Phone is too long"))]
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    #[validate(range(min = 0.0, message = "Value must not be negative"))]
    pub value: Option<f64>,
    pub priority: Option<LeadPriority>,
    pub source: Option<LeadSource>,
    /// `null` unassigns the lead
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub assigned_to: Option<Option<Uuid>>,
    #[validate(length(max = 5000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl UpdateLead {
    /// Normalize and validate into a set of changes.
    pub fn into_changes(self) -> AppResult<LeadChanges> {
        Ok(LeadChanges {
            company: self
                .company
                .map(|c| required_text("company", &c))
                .transpose()?,
            contact: self
                .contact
                .map(|c| required_text("contact", &c))
                .transpose()?,
            email: match self.email {
                Some(email) => Some(normalize_email(Some(email))?),
                None => None,
            },
            phone: self.phone.map(|p| optional_text(Some(p))),
            status: self.status,
            value: self.value.map(check_value).transpose()?,
            priority: self.priority,
            source: self.source,
            assigned_to: self.assigned_to,
            notes: self.notes.map(|n| optional_text(Some(n))),
        })
    }
}

/// Lead as returned to clients, with the assignee expanded
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: Uuid,
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub value: f64,
    pub priority: LeadPriority,
    pub source: LeadSource,
    pub assigned_to: Option<AssigneeSummary>,
    pub notes: Option<String>,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadResponse {
    pub fn new(lead: Lead, assignee: Option<AssigneeSummary>) -> Self {
        Self {
            id: lead.id,
            company: lead.company,
            contact: lead.contact,
            email: lead.email,
            phone: lead.phone,
            status: lead.status,
            value: lead.value,
            priority: lead.priority,
            source: lead.source,
            assigned_to: assignee,
            notes: lead.notes,
            last_activity: lead.last_activity,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_email(value: Option<String>) -> AppResult<Option<String>> {
    match optional_text(value) {
        Some(email) => {
            let email = email.to_lowercase();
            if !email.validate_email() {
                return Err(AppError::invalid_field("email", "Invalid email format"));
            }
            Ok(Some(email))
        }
        None => Ok(None),
    }
}

fn check_value(value: f64) -> AppResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::invalid_field(
            "value",
            "Value must be a non-negative number",
        ));
    }
    Ok(value)
}
