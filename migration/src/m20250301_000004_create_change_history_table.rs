use sea_orm_migration::prelude::*;

use crate::ChangeHistory;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChangeHistory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ChangeHistory::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ChangeHistory::EntityType).string_len(32).not_null())
                    .col(ColumnDef::new(ChangeHistory::EntityId).uuid().not_null())
                    .col(ColumnDef::new(ChangeHistory::Action).string_len(16).not_null())
                    .col(ColumnDef::new(ChangeHistory::Field).string_len(64).null())
                    .col(ColumnDef::new(ChangeHistory::OldValue).text().null())
                    .col(ColumnDef::new(ChangeHistory::NewValue).text().null())
                    // No foreign key: history outlives deleted users
                    .col(ColumnDef::new(ChangeHistory::ChangedBy).uuid().null())
                    .col(
                        ColumnDef::new(ChangeHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_change_history_entity")
                    .table(ChangeHistory::Table)
                    .col(ChangeHistory::EntityType)
                    .col(ChangeHistory::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_change_history_changed_at")
                    .table(ChangeHistory::Table)
                    .col(ChangeHistory::ChangedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChangeHistory::Table).to_owned())
            .await
    }
}
