//! Domain layer - Core business entities and logic
//!
//! Users, leads, roles and the scope predicates that decide visibility.
//! No infrastructure dependencies beyond error types.

pub mod identity;
pub mod lead;
pub mod password;
pub mod scope;
pub mod user;

pub use identity::Identity;
pub use lead::{
    CreateLead, Lead, LeadChanges, LeadPriority, LeadResponse, LeadSource, LeadStatus, UpdateLead,
};
pub use password::Password;
pub use scope::{LeadFilter, LeadScope, UserScope};
pub use user::{AssigneeSummary, User, UserResponse, UserRole};
