//! Navigation guard over a user's unsaved routing edits.
//!
//! Clients consult the guard before leaving the routing editor. The guard
//! inspects the user's editor in the registry; it keeps no state of its own.

use crate::{
    model::route::NavigationDto,
    server::service::route::registry::EditorRegistry,
};

/// Decision returned by the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Nothing would be lost by navigating away.
    Proceed,
    /// Unsaved edits exist in the listed guilds.
    Block { dirty_guild_ids: Vec<u64> },
}

impl Navigation {
    pub fn into_dto(self) -> NavigationDto {
        match self {
            Self::Proceed => NavigationDto {
                allowed: true,
                dirty_guild_ids: Vec::new(),
            },
            Self::Block { dirty_guild_ids } => NavigationDto {
                allowed: false,
                dirty_guild_ids: dirty_guild_ids
                    .into_iter()
                    .map(|guild_id| guild_id.to_string())
                    .collect(),
            },
        }
    }
}

pub struct NavigationGuard<'a> {
    registry: &'a EditorRegistry,
}

impl<'a> NavigationGuard<'a> {
    pub fn new(registry: &'a EditorRegistry) -> Self {
        Self { registry }
    }

    /// Checks whether the user can navigate away without losing edits.
    ///
    /// Pending debounced edits are applied first so an edit typed just before
    /// navigating is taken into account.
    ///
    /// # Returns
    /// - `Navigation::Proceed` - No editor, or no guild with unsaved edits
    /// - `Navigation::Block` - Guilds holding unsaved edits, in ascending id order
    pub async fn check(&self, user_id: u64) -> Navigation {
        self.registry.flush_edits(user_id).await;

        let Some(editor) = self.registry.existing(user_id).await else {
            return Navigation::Proceed;
        };

        let dirty_guild_ids = editor.lock().await.dirty_guilds();
        if dirty_guild_ids.is_empty() {
            Navigation::Proceed
        } else {
            Navigation::Block { dirty_guild_ids }
        }
    }
}
