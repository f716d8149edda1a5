//! Migration: Create leads table.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leads::Company).string().not_null())
                    .col(ColumnDef::new(Leads::Contact).string().not_null())
                    .col(ColumnDef::new(Leads::Email).string().null())
                    .col(ColumnDef::new(Leads::Phone).string().null())
                    .col(
                        ColumnDef::new(Leads::Status)
                            .string_len(32)
                            .not_null()
                            .default("new"),
                    )
                    .col(ColumnDef::new(Leads::Value).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Leads::Priority)
                            .string_len(32)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Leads::Source)
                            .string_len(32)
                            .not_null()
                            .default("website"),
                    )
                    .col(ColumnDef::new(Leads::AssignedTo).uuid().null())
                    .col(ColumnDef::new(Leads::Notes).text().null())
                    .col(
                        ColumnDef::new(Leads::LastActivity)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_assigned_to")
                            .from(Leads::Table, Leads::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_leads_assigned_to", Leads::AssignedTo),
            ("idx_leads_status", Leads::Status),
            ("idx_leads_last_activity", Leads::LastActivity),
            ("idx_leads_created_at", Leads::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Leads::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Leads {
    Table,
    Id,
    Company,
    Contact,
    Email,
    Phone,
    Status,
    Value,
    Priority,
    Source,
    AssignedTo,
    Notes,
    LastActivity,
    CreatedAt,
    UpdatedAt,
}
