pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_user_config_table;
mod m20261001_000002_create_channel_route_mapping_table;

/// Migrations for the primary database holding sessions and local config documents.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261001_000001_create_user_config_table::Migration)]
    }
}

/// Migrations for the remote routing store.
pub struct RemoteMigrator;

#[async_trait::async_trait]
impl MigratorTrait for RemoteMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20261001_000002_create_channel_route_mapping_table::Migration,
        )]
    }
}
