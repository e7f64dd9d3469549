// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the stockwatch configuration system.

use std::path::Path;

use stockwatch_config::diagnostic::ConfigError;
use stockwatch_config::{load_and_validate, load_and_validate_str, load_config_from_str};

const VALID: &str = r#"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
chat_ids = ["-100123", 456]

[monitor]
check_interval_ms = 3000
soldout_delete_after_secs = 60
banner = "Stock Monitor"

[scrape]
timeout_secs = 10

[keepalive]
port = 8080

[[targets]]
url = "https://idc.example.com/cart?fid=1"

[[targets]]
url = "https://shop.other.net/store"
title_regex = '<h4 class="name">([^<]+)</h4>'
"#;

/// A complete file deserializes and validates.
#[test]
fn valid_toml_loads_and_validates() {
    let config = load_and_validate_str(VALID).expect("valid config");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.chat_ids, vec!["-100123", "456"]);
    assert_eq!(config.monitor.check_interval_ms, 3000);
    assert_eq!(config.monitor.soldout_delete_after_secs, 60);
    assert_eq!(config.monitor.banner, "Stock Monitor");
    assert_eq!(config.scrape.timeout_secs, 10);
    assert_eq!(config.keepalive.port, Some(8080));
    assert_eq!(config.targets.len(), 2);
}

/// Omitted sections fall back to compiled defaults.
#[test]
fn omitted_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML is fine");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.monitor.check_interval_ms, 5000);
    assert_eq!(config.monitor.restock_idle_delete_secs, 300);
    assert_eq!(config.monitor.summary_refresh_secs, 120);
    assert_eq!(config.monitor.summary_delete_if_all_zero_secs, 600);
    assert_eq!(config.monitor.display_utc_offset_hours, 8);
    assert_eq!(config.scrape.timeout_secs, 20);
    assert!(config.keepalive.port.is_none());
    assert!(config.targets.is_empty());
}

/// A typo inside a section becomes an UnknownKey diagnostic with a suggestion.
#[test]
fn typo_in_monitor_section_suggests_fix() {
    let toml = r#"
[monitor]
banerr = "x"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "banerr" && suggestion.as_deref() == Some("banner")
        )
    });
    assert!(found, "expected banner suggestion, got: {errors:?}");
}

/// Unknown keys in a target table are rejected.
#[test]
fn unknown_target_key_is_rejected() {
    let toml = r#"
[[targets]]
url = "https://idc.example.com"
titleRegex = "x"
"#;
    let err = load_config_from_str(toml).expect_err("unknown field");
    assert!(format!("{err}").contains("titleRegex"));
}

/// A wrongly typed value is reported against its key.
#[test]
fn wrong_type_reports_key() {
    let toml = r#"
[monitor]
check_interval_ms = "fast"
"#;
    let errors = load_and_validate_str(toml).expect_err("bad type");
    let found = errors.iter().any(|e| match e {
        ConfigError::InvalidType { key, .. } => key.contains("check_interval_ms"),
        _ => false,
    });
    assert!(found, "expected InvalidType, got: {errors:?}");
}

/// Validation collects every problem rather than stopping at the first.
#[test]
fn validation_collects_all_errors() {
    let toml = r#"
[monitor]
summary_refresh_secs = 0

[[targets]]
url = "idc.example.com"
"#;
    let errors = load_and_validate_str(toml).expect_err("invalid");
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(rendered.iter().any(|m| m.contains("bot_token")));
    assert!(rendered.iter().any(|m| m.contains("chat_ids")));
    assert!(rendered.iter().any(|m| m.contains("summary_refresh_secs")));
    assert!(rendered.iter().any(|m| m.contains("targets[0].url")));
}

/// An explicit path is honored and overridden by environment variables.
#[test]
fn explicit_path_with_env_override() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("watch.toml", VALID)?;
        jail.set_env("STOCKWATCH_MONITOR_BANNER", "From Env");
        jail.set_env("STOCKWATCH_LOG_LEVEL", "warn");

        let config = load_and_validate(Some(Path::new("watch.toml")))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.monitor.banner, "From Env");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.monitor.check_interval_ms, 3000);
        Ok(())
    });
}

/// Diagnostics for an explicit file carry a source span.
#[test]
fn unknown_key_in_file_has_span() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("watch.toml", "[telegram]\nbot_tken = \"x\"\n")?;

        let errors = match load_and_validate(Some(Path::new("watch.toml"))) {
            Ok(_) => return Err("expected an error".into()),
            Err(errors) => errors,
        };
        let span = errors.iter().find_map(|e| match e {
            ConfigError::UnknownKey { span, .. } => *span,
            _ => None,
        });
        assert!(span.is_some(), "expected a span, got: {errors:?}");
        Ok(())
    });
}
