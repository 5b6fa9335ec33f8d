//! Duplicate path detection across a guild's mapping.
//!
//! Detection is a full recompute over the mapping on every call. Guilds hold
//! tens of routable channels, so there is no incremental bookkeeping.

use std::collections::{BTreeSet, HashMap};

use crate::server::model::route::RouteMapping;

/// Returns every non-empty path assigned to more than one channel.
pub fn find_duplicates(mapping: &RouteMapping) -> BTreeSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for path in mapping.values().filter(|path| !path.is_empty()) {
        *counts.entry(path.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path.to_string())
        .collect()
}

/// Returns the channels whose path is shared with at least one other channel.
pub fn duplicate_channels(mapping: &RouteMapping) -> BTreeSet<String> {
    let duplicates = find_duplicates(mapping);

    mapping
        .iter()
        .filter(|(_, path)| duplicates.contains(path.as_str()))
        .map(|(channel_id, _)| channel_id.clone())
        .collect()
}
