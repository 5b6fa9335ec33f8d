//! Channel routing engine.
//!
//! Maintains, per user and guild, a mapping from Discord channel ids to
//! application route paths. Pure building blocks (`path`, `conflict`, `bulk`,
//! `store`) are composed by the `RoutingEditor`, which persists through the
//! `SyncReconciler`. Editors live in the `EditorRegistry`; the
//! `NavigationGuard` reports unsaved edits before a client navigates away.

pub mod bulk;
pub mod conflict;
pub mod editor;
pub mod guard;
pub mod path;
pub mod registry;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test;
