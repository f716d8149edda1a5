//! Lead database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Lead;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Double")]
    pub value: f64,
    pub priority: String,
    pub source: String,
    /// Nullable FK to users; `ON DELETE SET NULL`
    pub assigned_to: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub last_activity: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedTo",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Assignee,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Lead {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let id = model.id;
        let corrupt = |field: &str, value: &str| {
            AppError::internal(format!("lead {} has unknown {} `{}`", id, field, value))
        };

        Ok(Lead {
            id,
            status: model
                .status
                .parse()
                .map_err(|_| corrupt("status", &model.status))?,
            priority: model
                .priority
                .parse()
                .map_err(|_| corrupt("priority", &model.priority))?,
            source: model
                .source
                .parse()
                .map_err(|_| corrupt("source", &model.source))?,
            company: model.company,
            contact: model.contact,
            email: model.email,
            phone: model.phone,
            value: model.value,
            assigned_to: model.assigned_to,
            notes: model.notes,
            last_activity: model.last_activity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Lead> for ActiveModel {
    fn from(lead: Lead) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(lead.id),
            company: Set(lead.company),
            contact: Set(lead.contact),
            email: Set(lead.email),
            phone: Set(lead.phone),
            status: Set(lead.status.as_str().to_string()),
            value: Set(lead.value),
            priority: Set(lead.priority.as_str().to_string()),
            source: Set(lead.source.as_str().to_string()),
            assigned_to: Set(lead.assigned_to),
            notes: Set(lead.notes),
            last_activity: Set(lead.last_activity),
            created_at: Set(lead.created_at),
            updated_at: Set(lead.updated_at),
        }
    }
}
