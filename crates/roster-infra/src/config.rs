//! Configuration loader for roster.
//!
//! Reads `config.toml` from the data directory (`~/.roster/` by default) and
//! deserializes it into [`RosterConfig`]. Falls back to defaults when the file
//! is missing or malformed, then applies `ROSTER_*` environment overrides.

use std::path::{Path, PathBuf};

use roster_types::config::RosterConfig;

use crate::sqlite::pool::default_database_url;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RosterConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> RosterConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RosterConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RosterConfig::default();
        }
    };

    match toml::from_str::<RosterConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RosterConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority:
/// 1. `ROSTER_DATA_DIR` environment variable
/// 2. `~/.roster`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ROSTER_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".roster");
    }

    PathBuf::from(".roster")
}

/// Apply `ROSTER_HOST`, `ROSTER_PORT`, `ROSTER_DATABASE_URL` and
/// `ROSTER_SELECTION_SEED` from the process environment.
pub fn apply_env_overrides(config: &mut RosterConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut RosterConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("ROSTER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("ROSTER_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring ROSTER_PORT={port}: {err}"),
        }
    }
    if let Some(url) = lookup("ROSTER_DATABASE_URL") {
        config.database.url = Some(url);
    }
    if let Some(seed) = lookup("ROSTER_SELECTION_SEED") {
        match seed.parse() {
            Ok(seed) => config.selection.seed = Some(seed),
            Err(err) => tracing::warn!("Ignoring ROSTER_SELECTION_SEED={seed}: {err}"),
        }
    }
}

/// The configured database URL, or `roster.db` inside `data_dir`.
pub fn database_url(config: &RosterConfig, data_dir: &Path) -> String {
    config
        .database
        .url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir))
}
