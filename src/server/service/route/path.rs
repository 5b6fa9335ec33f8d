//! Route path normalization and validation.
//!
//! A path is either empty (unset) or an absolute route such as `/signals` or
//! `/forum/:threadId`. Input is always normalized before it is validated or
//! stored.

/// Checks a route path against the path syntax rules.
///
/// The empty string is valid and means "unset". A non-empty path must start with
/// `/`, contain only ASCII letters, digits, `:`, `_`, `/` and `-`, contain no `//`,
/// and must not end with `/` unless it is exactly `/`.
///
/// # Arguments
/// - `path` - Candidate path, expected to be normalized already
///
/// # Returns
/// - `true` - Path is empty or well formed
/// - `false` - Path breaks at least one rule
pub fn validate(path: &str) -> bool {
    if path.is_empty() || path == "/" {
        return true;
    }

    path.starts_with('/')
        && path.chars().all(is_path_char)
        && !path.contains("//")
        && !path.ends_with('/')
}

/// Normalizes user input into a path.
///
/// Trims surrounding whitespace and prepends `/` to non-empty input that lacks it.
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();

    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Derives a path segment from a channel display name.
///
/// Strips a leading `#`, lowercases and joins whitespace-separated words with `-`.
/// `#Alpha Setup` becomes `alpha-setup`.
pub fn slugify(display_name: &str) -> String {
    strip_channel_hash(display_name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Removes the `#` Discord prefixes channel mentions with, along with surrounding whitespace.
pub fn strip_channel_hash(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).trim_start()
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '/' | '-')
}
