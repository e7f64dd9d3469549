// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for stockwatch.

use thiserror::Error;

/// The primary error type used across the collaborator traits and the monitor.
#[derive(Debug, Error)]
pub enum StockwatchError {
    /// Configuration errors detected outside of the config crate's diagnostics.
    #[error("configuration error: {0}")]
    Config(String),

    /// A target page could not be fetched (transport failure or non-2xx status).
    #[error("fetch failed for {url}: {message}")]
    Fetch {
        url: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A send, edit or delete on the notification channel failed.
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StockwatchError {
    /// Builds a [`StockwatchError::Notify`] wrapping an underlying error.
    pub fn notify(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Notify {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
