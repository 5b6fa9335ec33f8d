//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Registry of per-user routing editors
//! - Discord channel directory for listing a guild's channels

use crate::server::service::{discord::DiscordChannelDirectory, route::registry::EditorRegistry};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone:
/// - `EditorRegistry` shares its editors and pending edits through `Arc`
/// - `DiscordChannelDirectory` wraps an `Arc<Http>`
#[derive(Clone)]
pub struct AppState {
    /// Per-user routing editors and their pending edits.
    ///
    /// Replaces any process-global editor state; handlers and the navigation
    /// guard reach editors only through this registry.
    pub editors: EditorRegistry,

    /// Lists the routable channels of a guild.
    pub channel_directory: DiscordChannelDirectory,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `editors` - Registry of routing editors
    /// - `channel_directory` - Discord channel directory
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(editors: EditorRegistry, channel_directory: DiscordChannelDirectory) -> Self {
        Self {
            editors,
            channel_directory,
        }
    }
}
