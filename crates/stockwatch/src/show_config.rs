// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockwatch config`: print the effective configuration.

use stockwatch_config::StockwatchConfig;
use stockwatch_core::StockwatchError;

const REDACTED: &str = "<redacted>";

pub fn run_config(config: &StockwatchConfig) -> Result<(), StockwatchError> {
    print!("{}", render(config)?);
    Ok(())
}

/// Serializes `config` as TOML with the bot token masked.
pub fn render(config: &StockwatchConfig) -> Result<String, StockwatchError> {
    let mut shown = config.clone();
    if shown.telegram.bot_token.is_some() {
        shown.telegram.bot_token = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| StockwatchError::Internal(format!("failed to serialize config: {e}")))
}
