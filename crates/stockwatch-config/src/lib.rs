// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for stockwatch.
//!
//! TOML parsing with strict validation (`deny_unknown_fields`), XDG file
//! hierarchy lookup, `STOCKWATCH_*` environment overrides, and miette
//! diagnostics with typo suggestions.
//!
//! ```no_run
//! use stockwatch_config::load_and_validate;
//!
//! let config = load_and_validate(None).expect("config errors");
//! println!("watching {} pages", config.targets.len());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{KeepaliveConfig, MonitorConfig, ScrapeConfig, StockwatchConfig, TelegramConfig};

/// Load configuration and validate it.
///
/// With `path`, that file plus environment overrides is used; otherwise the
/// XDG hierarchy is searched. Figment errors are converted into diagnostics
/// carrying source spans where the offending file can be located.
pub fn load_and_validate(path: Option<&Path>) -> Result<StockwatchConfig, Vec<ConfigError>> {
    let loaded = match path {
        Some(p) => loader::load_config_from_path(p),
        None => loader::load_config(),
    };

    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = match path {
                Some(p) => read_source(p).into_iter().collect(),
                None => collect_toml_sources(),
            };
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<StockwatchConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

fn read_source(path: &Path) -> Option<(String, String)> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| (path.display().to_string(), content))
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.to_string());
        sources.push((path, content));
    }

    if let Some(source) = loader::user_config_path().and_then(|p| read_source(&p)) {
        sources.push(source);
    }

    if let Some(source) = read_source(Path::new(loader::SYSTEM_CONFIG_PATH)) {
        sources.push(source);
    }

    sources
}
