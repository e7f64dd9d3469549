// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as required credentials, well-formed target URLs, compilable patterns,
//! and non-zero durations.

use std::collections::HashSet;

use regex::Regex;

use crate::diagnostic::ConfigError;
use crate::model::StockwatchConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &StockwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level `{}` is not one of {}",
                config.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    match config.telegram.bot_token.as_deref().map(str::trim) {
        None => errors.push(ConfigError::MissingKey {
            key: "telegram.bot_token".to_string(),
        }),
        Some("") => errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    if config.telegram.chat_ids.is_empty() {
        errors.push(ConfigError::Validation {
            message: "telegram.chat_ids must list at least one chat".to_string(),
        });
    }

    let mut seen_chats = HashSet::new();
    for chat in &config.telegram.chat_ids {
        if !seen_chats.insert(chat) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate chat id `{chat}` in telegram.chat_ids"),
            });
        }
    }

    if config.targets.is_empty() {
        errors.push(ConfigError::Validation {
            message: "at least one [[targets]] entry is required".to_string(),
        });
    }

    for (i, target) in config.targets.iter().enumerate() {
        let url = target.url.trim();
        if url.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("targets[{i}].url must not be empty"),
            });
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::Validation {
                message: format!("targets[{i}].url `{url}` must start with http:// or https://"),
            });
        }

        if let Some(pattern) = &target.title_regex {
            if let Err(e) = Regex::new(pattern) {
                errors.push(ConfigError::Validation {
                    message: format!("targets[{i}].title_regex does not compile: {e}"),
                });
            }
        }
    }

    match Regex::new(&config.scrape.stock_pattern) {
        Ok(re) if re.captures_len() < 2 => errors.push(ConfigError::Validation {
            message: "scrape.stock_pattern needs a capture group for the stock count".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ConfigError::Validation {
            message: format!("scrape.stock_pattern does not compile: {e}"),
        }),
    }

    let durations = [
        ("monitor.check_interval_ms", config.monitor.check_interval_ms),
        (
            "monitor.soldout_delete_after_secs",
            config.monitor.soldout_delete_after_secs,
        ),
        (
            "monitor.restock_idle_delete_secs",
            config.monitor.restock_idle_delete_secs,
        ),
        ("monitor.summary_refresh_secs", config.monitor.summary_refresh_secs),
        (
            "monitor.summary_delete_if_all_zero_secs",
            config.monitor.summary_delete_if_all_zero_secs,
        ),
        ("scrape.timeout_secs", config.scrape.timeout_secs),
    ];
    for (key, value) in durations {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than zero"),
            });
        }
    }

    if !(-12..=14).contains(&config.monitor.display_utc_offset_hours) {
        errors.push(ConfigError::Validation {
            message: format!(
                "monitor.display_utc_offset_hours must be within -12..=14, got {}",
                config.monitor.display_utc_offset_hours
            ),
        });
    }

    if config.keepalive.port.is_some() && config.keepalive.bind_address.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "keepalive.bind_address must not be empty when keepalive.port is set"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
