//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the repositories. The `route` module
//! holds the per-user routing editor and everything it coordinates, `discord`
//! wraps the Discord HTTP client used to list a guild's channels.

pub mod discord;
pub mod route;
