use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChannelRouteMapping::Table)
                    .if_not_exists()
                    .col(pk_auto(ChannelRouteMapping::Id))
                    .col(string(ChannelRouteMapping::UserId))
                    .col(string(ChannelRouteMapping::GuildId))
                    .col(text(ChannelRouteMapping::Mapping))
                    .col(timestamp_with_time_zone(ChannelRouteMapping::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // One record per (user, guild)
        manager
            .create_index(
                Index::create()
                    .name("idx_channel_route_mapping_user_guild")
                    .table(ChannelRouteMapping::Table)
                    .col(ChannelRouteMapping::UserId)
                    .col(ChannelRouteMapping::GuildId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_channel_route_mapping_user_guild")
                    .table(ChannelRouteMapping::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ChannelRouteMapping::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ChannelRouteMapping {
    Table,
    Id,
    UserId,
    GuildId,
    Mapping,
    UpdatedAt,
}
