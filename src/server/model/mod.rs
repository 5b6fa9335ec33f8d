//! Domain models and operation parameters for the server layers.
//!
//! Models convert from SeaORM entities at the repository boundary (`from_entity`)
//! and into API DTOs at the controller boundary (`into_dto`).

pub mod route;
pub mod route_mapping;
pub mod user_config;
