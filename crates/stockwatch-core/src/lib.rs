// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for stockwatch.
//!
//! This crate provides the error type, the value types shared between the
//! monitor and its adapters, and the three collaborator traits the monitor
//! is written against: [`PageFetcher`], [`StockParser`] and [`Notifier`].

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StockwatchError;
pub use types::{
    ActionKind, ChatId, InlineButton, ItemKey, MessageId, OutboundMessage, ParsedItem, Target,
    UserAction,
};

pub use traits::{Notifier, PageFetcher, StockParser};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stockwatch_error_has_all_variants() {
        let _config = StockwatchError::Config("test".into());
        let _fetch = StockwatchError::Fetch {
            url: "https://example.com".into(),
            message: "HTTP 502".into(),
            source: None,
        };
        let _notify = StockwatchError::Notify {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _internal = StockwatchError::Internal("test".into());
    }

    #[test]
    fn fetch_error_display_names_url() {
        let err = StockwatchError::Fetch {
            url: "https://shop.example.com/cart".into(),
            message: "HTTP 503".into(),
            source: None,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("shop.example.com"), "got: {rendered}");
        assert!(rendered.contains("HTTP 503"), "got: {rendered}");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_fetcher<T: PageFetcher>() {}
        fn _assert_parser<T: StockParser>() {}
        fn _assert_notifier<T: Notifier>() {}
    }
}
