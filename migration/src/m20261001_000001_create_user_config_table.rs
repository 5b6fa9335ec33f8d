use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserConfig::Table)
                    .if_not_exists()
                    .col(pk_auto(UserConfig::Id))
                    .col(string_uniq(UserConfig::UserId))
                    .col(text(UserConfig::Document))
                    .col(timestamp_with_time_zone(UserConfig::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserConfig::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserConfig {
    Table,
    Id,
    UserId,
    Document,
    UpdatedAt,
}
