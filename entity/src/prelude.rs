pub use super::channel_route_mapping::Entity as ChannelRouteMapping;
pub use super::user_config::Entity as UserConfig;
