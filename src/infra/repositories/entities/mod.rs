//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod lead;
pub mod user;

#[allow(unused_imports)]
pub use lead::{ActiveModel as LeadActiveModel, Entity as LeadEntity, Model as LeadModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
