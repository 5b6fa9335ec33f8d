//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let record = factory::route_mapping::create_route_mapping(&db).await?;
//!
//!     // Customize
//!     let record = factory::route_mapping::RouteMappingFactory::new(&db)
//!         .user_id("42")
//!         .guild_id("1001")
//!         .route("c1", "/signals")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `route_mapping` - Create remote channel route mapping records
//! - `user_config` - Create local per-user configuration documents
//! - `helpers` - Shared ID generation

pub mod helpers;
pub mod route_mapping;
pub mod user_config;

pub use route_mapping::create_route_mapping;
pub use user_config::create_user_config;
