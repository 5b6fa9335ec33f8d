//! Server-side API backend and routing engine.
//!
//! The backend uses Axum as the web framework, SeaORM for database operations, and
//! Serenity's HTTP client to list guild channels from Discord.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers and DTO conversion
//! - **Service Layer** (`service/`) - Routing editor, validation, bulk operations and sync
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Session access and authentication guards
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (editor registry, Discord client)
//! - **Startup** (`startup`) - Initialization of databases, sessions and the Discord client
//! - **Router** (`router`) - Axum route configuration and API documentation
//! - **Scheduler** (`scheduler/`) - Cron jobs, currently idle editor eviction
//!
//! # Request Flow
//!
//! 1. **Router** receives HTTP request and routes to the controller
//! 2. **Middleware** resolves the signed-in user from the session
//! 3. **Controller** flushes pending edits and locks the user's editor
//! 4. **Service** mutates the working copy, validates, or persists it
//! 5. **Data** reads and writes the local document and the remote store
//! 6. **Controller** converts the result to a DTO and returns it

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
