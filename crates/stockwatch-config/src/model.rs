// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for stockwatch.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use stockwatch_core::{ChatId, Target};

/// Top-level stockwatch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Every section except `telegram` and `targets` has usable defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StockwatchConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Telegram bot and recipient chats.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Check cadence and notification lifetimes.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Page fetching and stock extraction.
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Optional keepalive HTTP endpoint.
    #[serde(default)]
    pub keepalive: KeepaliveConfig,

    /// Product pages to monitor.
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Default for StockwatchConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            telegram: TelegramConfig::default(),
            monitor: MonitorConfig::default(),
            scrape: ScrapeConfig::default(),
            keepalive: KeepaliveConfig::default(),
            targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to run.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chats that receive stock notifications.
    ///
    /// Accepts a list of strings or integers, or a single comma-separated string
    /// (the usual shape when set through an environment variable).
    #[serde(default, deserialize_with = "deserialize_chat_ids")]
    pub chat_ids: Vec<String>,
}

impl TelegramConfig {
    pub fn chats(&self) -> Vec<ChatId> {
        self.chat_ids.iter().map(|id| ChatId(id.clone())).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatIdRepr {
    Int(i64),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatIdList {
    List(Vec<ChatIdRepr>),
    Single(i64),
    Csv(String),
}

fn deserialize_chat_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = match ChatIdList::deserialize(deserializer)? {
        ChatIdList::List(items) => items
            .into_iter()
            .map(|item| match item {
                ChatIdRepr::Int(n) => n.to_string(),
                ChatIdRepr::Str(s) => s.trim().to_string(),
            })
            .collect(),
        ChatIdList::Single(n) => vec![n.to_string()],
        ChatIdList::Csv(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };
    Ok(ids)
}

/// Check cadence and notification lifetime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Interval between stock check cycles, in milliseconds.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,

    /// Sold-out notifications are deleted this long after being sent.
    #[serde(default = "default_soldout_delete_after_secs")]
    pub soldout_delete_after_secs: u64,

    /// Restock notifications are deleted after this long without a stock change.
    #[serde(default = "default_restock_idle_delete_secs")]
    pub restock_idle_delete_secs: u64,

    /// Summaries are refreshed in place at this cadence.
    #[serde(default = "default_summary_refresh_secs")]
    pub summary_refresh_secs: u64,

    /// A summary showing no stock anywhere is deleted after this long.
    #[serde(default = "default_summary_delete_if_all_zero_secs")]
    pub summary_delete_if_all_zero_secs: u64,

    /// UTC offset used for timestamps rendered into notifications.
    #[serde(default = "default_display_utc_offset_hours")]
    pub display_utc_offset_hours: i32,

    /// Banner shown at the top of every notification.
    #[serde(default = "default_banner")]
    pub banner: String,
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn soldout_delete_after(&self) -> Duration {
        Duration::from_secs(self.soldout_delete_after_secs)
    }

    pub fn restock_idle_delete(&self) -> Duration {
        Duration::from_secs(self.restock_idle_delete_secs)
    }

    pub fn summary_refresh(&self) -> Duration {
        Duration::from_secs(self.summary_refresh_secs)
    }

    pub fn summary_delete_if_all_zero(&self) -> Duration {
        Duration::from_secs(self.summary_delete_if_all_zero_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: default_check_interval_ms(),
            soldout_delete_after_secs: default_soldout_delete_after_secs(),
            restock_idle_delete_secs: default_restock_idle_delete_secs(),
            summary_refresh_secs: default_summary_refresh_secs(),
            summary_delete_if_all_zero_secs: default_summary_delete_if_all_zero_secs(),
            display_utc_offset_hours: default_display_utc_offset_hours(),
            banner: default_banner(),
        }
    }
}

fn default_check_interval_ms() -> u64 {
    5000
}

fn default_soldout_delete_after_secs() -> u64 {
    120
}

fn default_restock_idle_delete_secs() -> u64 {
    300
}

fn default_summary_refresh_secs() -> u64 {
    120
}

fn default_summary_delete_if_all_zero_secs() -> u64 {
    600
}

fn default_display_utc_offset_hours() -> i32 {
    8
}

fn default_banner() -> String {
    "ZJMF Monitor".to_string()
}

/// Page fetching and stock extraction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Pattern locating a stock count; capture group 1 is the number.
    #[serde(default = "default_stock_pattern")]
    pub stock_pattern: String,

    /// `User-Agent` header sent with every page request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `Accept-Language` header sent with every page request.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            stock_pattern: default_stock_pattern(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_stock_pattern() -> String {
    r"库存\s*[:：]\s*(\d+)".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_accept_language() -> String {
    "zh-CN,zh;q=0.9".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

/// Keepalive HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeepaliveConfig {
    /// Port to listen on. `None` disables the endpoint.
    #[serde(default)]
    pub port: Option<u16>,

    /// Address to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            port: None,
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
