//! Bulk rule application over a guild's channels.
//!
//! Rules compute the complete set of updates before anything is written, so a
//! rejected rule leaves the mapping untouched. Applying the updates is left to
//! the editor, which records them in the store and the audit log.

use crate::server::{
    error::routing::RoutingError,
    model::route::Channel,
    service::route::path::{normalize, slugify, strip_channel_hash},
};

/// Placeholder in a pattern template replaced by the unmatched part of the channel name.
pub const NAME_PLACEHOLDER: &str = ":name";

/// A single computed path assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUpdate {
    pub channel_id: String,
    pub path: String,
}

/// Computes prefix-mode updates for the selected channels.
///
/// Each channel gets `normalize(prefix + slug(name))`. The prefix is used verbatim,
/// so `/signals/` yields `/signals/alpha-setup` while `/signals` yields
/// `/signalsalpha-setup`.
///
/// # Arguments
/// - `channels` - The guild's channel list
/// - `channel_ids` - Channels selected for the rule
/// - `prefix` - Path prefix to prepend to each slug
///
/// # Returns
/// - `Ok(Vec<RouteUpdate>)` - One update per selected channel, in selection order
/// - `Err(RoutingError::UnknownChannels)` - A selected id is not in the channel list; nothing applies
pub fn prefix_updates(
    channels: &[Channel],
    channel_ids: &[String],
    prefix: &str,
) -> Result<Vec<RouteUpdate>, RoutingError> {
    let mut updates = Vec::with_capacity(channel_ids.len());
    let mut unknown = Vec::new();

    for channel_id in channel_ids {
        match channels.iter().find(|channel| &channel.id == channel_id) {
            Some(channel) => updates.push(RouteUpdate {
                channel_id: channel.id.clone(),
                path: normalize(&format!("{}{}", prefix, slugify(&channel.name))),
            }),
            None => unknown.push(channel_id.clone()),
        }
    }

    if !unknown.is_empty() {
        return Err(RoutingError::UnknownChannels(unknown));
    }

    Ok(updates)
}

/// Computes pattern-mode updates across all channels.
///
/// `pattern` has the form `literal*`. Every channel whose name (leading `#`
/// stripped) starts with `literal`, compared case-insensitively, gets `template`
/// with `:name` replaced by the rest of the name, normalized. A pattern without a
/// trailing `*` must match the whole name. Channels that do not match are left out.
///
/// # Returns
/// - `Ok(Vec<RouteUpdate>)` - Updates for every matching channel
/// - `Err(RoutingError::InvalidPattern)` - Pattern is empty
pub fn pattern_updates(
    channels: &[Channel],
    pattern: &str,
    template: &str,
) -> Result<Vec<RouteUpdate>, RoutingError> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(RoutingError::InvalidPattern(pattern.to_string()));
    }

    let (literal, wildcard) = match pattern.strip_suffix('*') {
        Some(literal) => (strip_channel_hash(literal), true),
        None => (strip_channel_hash(pattern), false),
    };

    let updates = channels
        .iter()
        .filter_map(|channel| {
            let name = strip_channel_hash(&channel.name);
            let rest = strip_prefix_ignore_case(name, literal)?;

            if !wildcard && !rest.is_empty() {
                return None;
            }

            Some(RouteUpdate {
                channel_id: channel.id.clone(),
                path: normalize(&template.replace(NAME_PLACEHOLDER, rest)),
            })
        })
        .collect();

    Ok(updates)
}

/// Strips `prefix` from the start of `name`, ignoring case.
fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = name.char_indices();

    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }

    let offset = chars.next().map_or(name.len(), |(index, _)| index);
    Some(&name[offset..])
}
