// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./stockwatch.toml` > `~/.config/stockwatch/stockwatch.toml`
//! > `/etc/stockwatch/stockwatch.toml` with environment variable overrides via the
//! `STOCKWATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StockwatchConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/stockwatch/stockwatch.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "stockwatch.toml";

/// Sections whose keys may be set through `STOCKWATCH_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &["telegram", "monitor", "scrape", "keepalive"];

/// Path of the per-user configuration file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stockwatch").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/stockwatch/stockwatch.toml` (system-wide)
/// 3. `~/.config/stockwatch/stockwatch.toml` (user XDG config)
/// 4. `./stockwatch.toml` (local directory)
/// 5. `PORT` (keepalive port injected by hosting platforms)
/// 6. `STOCKWATCH_*` environment variables
pub fn load_config() -> Result<StockwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StockwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StockwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(port_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StockwatchConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(port_provider())
        .merge(env_provider())
}

/// Map the bare `PORT` variable onto `keepalive.port`.
fn port_provider() -> Env {
    Env::raw()
        .only(&["PORT"])
        .map(|_| "keepalive.port".into())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Only a leading section name is rewritten, so `STOCKWATCH_TELEGRAM_BOT_TOKEN`
/// maps to `telegram.bot_token` and `STOCKWATCH_LOG_LEVEL` stays `log_level`.
fn env_provider() -> Env {
    Env::prefixed("STOCKWATCH_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
