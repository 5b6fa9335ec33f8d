use sea_orm::entity::prelude::*;

/// Remote copy of a user's channel route mapping for one guild.
///
/// `mapping` holds a flat JSON object of channel id to path strings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "channel_route_mapping")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub guild_id: String,
    #[sea_orm(column_type = "Text")]
    pub mapping: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
