use std::{net::SocketAddr, time::Duration};

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_ROUTE_EDIT_DEBOUNCE_MS: u64 = 200;
const DEFAULT_EDITOR_IDLE_TTL_HOURS: u64 = 24;

pub struct Config {
    /// Primary SQLite database holding sessions and user configuration documents.
    pub database_url: String,
    /// Remote routing store. Remote synchronization is off when unset.
    pub remote_database_url: Option<String>,

    pub discord_bot_token: String,

    pub bind_address: SocketAddr,
    /// Origin allowed by CORS, if the frontend is served from another host.
    pub app_url: Option<String>,

    pub route_edit_debounce: Duration,
    pub editor_idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_value =
            optional("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: "BIND_ADDRESS".to_string(),
                value: bind_value.clone(),
                reason: e.to_string(),
            })?;

        let debounce_ms = parse_u64_or(
            "ROUTE_EDIT_DEBOUNCE_MS",
            optional("ROUTE_EDIT_DEBOUNCE_MS"),
            DEFAULT_ROUTE_EDIT_DEBOUNCE_MS,
        )?;
        let idle_ttl_hours = parse_u64_or(
            "EDITOR_IDLE_TTL_HOURS",
            optional("EDITOR_IDLE_TTL_HOURS"),
            DEFAULT_EDITOR_IDLE_TTL_HOURS,
        )?;
        let editor_idle_ttl = idle_ttl_hours
            .checked_mul(60 * 60)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::InvalidEnvVar {
                name: "EDITOR_IDLE_TTL_HOURS".to_string(),
                value: idle_ttl_hours.to_string(),
                reason: "duration is too large".to_string(),
            })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            remote_database_url: optional("REMOTE_DATABASE_URL"),
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            bind_address,
            app_url: optional("APP_URL"),
            route_edit_debounce: Duration::from_millis(debounce_ms),
            editor_idle_ttl,
        })
    }
}

fn parse_u64_or(name: &str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = config(&[
            ("DATABASE_URL", "sqlite://routeboard.db?mode=rwc"),
            ("DISCORD_BOT_TOKEN", "token"),
        ])
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.remote_database_url, None);
        assert_eq!(config.app_url, None);
        assert_eq!(config.route_edit_debounce, Duration::from_millis(200));
        assert_eq!(config.editor_idle_ttl, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn reads_optional_values() {
        let config = config(&[
            ("DATABASE_URL", "sqlite://routeboard.db?mode=rwc"),
            ("REMOTE_DATABASE_URL", "postgres://routes@db/routes"),
            ("DISCORD_BOT_TOKEN", "token"),
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("ROUTE_EDIT_DEBOUNCE_MS", "50"),
            ("EDITOR_IDLE_TTL_HOURS", "2"),
        ])
        .unwrap();

        assert_eq!(
            config.remote_database_url.as_deref(),
            Some("postgres://routes@db/routes")
        );
        assert_eq!(config.bind_address, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.route_edit_debounce, Duration::from_millis(50));
        assert_eq!(config.editor_idle_ttl, Duration::from_secs(2 * 60 * 60));
    }

    #[test]
    fn blank_remote_url_means_off() {
        let config = config(&[
            ("DATABASE_URL", "sqlite://routeboard.db?mode=rwc"),
            ("REMOTE_DATABASE_URL", "  "),
            ("DISCORD_BOT_TOKEN", "token"),
        ])
        .unwrap();

        assert_eq!(config.remote_database_url, None);
    }

    #[test]
    fn missing_database_url_fails() {
        let result = config(&[("DISCORD_BOT_TOKEN", "token")]);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(name))) if name == "DATABASE_URL"
        ));
    }

    #[test]
    fn invalid_debounce_fails() {
        let result = config(&[
            ("DATABASE_URL", "sqlite://routeboard.db?mode=rwc"),
            ("DISCORD_BOT_TOKEN", "token"),
            ("ROUTE_EDIT_DEBOUNCE_MS", "soon"),
        ]);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { .. }))
        ));
    }

    #[test]
    fn oversized_idle_ttl_fails() {
        let result = config(&[
            ("DATABASE_URL", "sqlite://routeboard.db?mode=rwc"),
            ("DISCORD_BOT_TOKEN", "token"),
            ("EDITOR_IDLE_TTL_HOURS", "18446744073709551615"),
        ]);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { name, .. }))
                if name == "EDITOR_IDLE_TTL_HOURS"
        ));
    }
}
