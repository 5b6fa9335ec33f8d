use std::sync::Arc;

use serenity::{
    all::{GuildChannel, GuildId},
    http::Http,
};

use crate::server::{error::AppError, model::route::Channel};

/// Channel directory backed by the Discord HTTP API.
///
/// Lists the channels of a guild that can carry a route. The bot must be a
/// member of the guild.
#[derive(Clone)]
pub struct DiscordChannelDirectory {
    http: Arc<Http>,
}

impl DiscordChannelDirectory {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Lists the routable channels of a guild
    ///
    /// Only text, announcement, forum and voice channels are returned, ordered by
    /// their position in the Discord sidebar.
    ///
    /// # Arguments
    /// - `guild_id`: Discord's unique identifier for the guild (u64)
    ///
    /// # Returns
    /// - `Ok(Vec<Channel>)`: Routable channels of the guild
    /// - `Err(AppError::BadRequest)`: Guild id is zero
    /// - `Err(AppError::DiscordErr)`: Discord API request failed
    pub async fn list_channels(&self, guild_id: u64) -> Result<Vec<Channel>, AppError> {
        if guild_id == 0 {
            return Err(AppError::BadRequest("Invalid guild id 0".to_string()));
        }

        let guild_channels = self.http.get_channels(GuildId::new(guild_id)).await?;
        let channels = routable_channels(guild_channels);

        tracing::debug!(
            "Fetched {} routable channels for guild {}",
            channels.len(),
            guild_id
        );

        Ok(channels)
    }
}

fn routable_channels(mut guild_channels: Vec<GuildChannel>) -> Vec<Channel> {
    guild_channels.sort_by_key(|channel| (channel.position, channel.id));

    guild_channels
        .iter()
        .filter_map(Channel::from_guild_channel)
        .collect()
}
