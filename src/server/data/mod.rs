//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models so the
//! service layer never touches entities directly.
//!
//! - `route_mapping` - Remote routing store, one record per user and guild
//! - `user_config` - Local per-user configuration document holding saved routes

pub mod route_mapping;
pub mod user_config;

#[cfg(test)]
mod test;
