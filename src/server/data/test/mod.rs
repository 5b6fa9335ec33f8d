mod route_mapping;
mod user_config;
