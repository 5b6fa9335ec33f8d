//! SeaORM entity definitions for the routing tables.

pub mod prelude;

pub mod channel_route_mapping;
pub mod user_config;
