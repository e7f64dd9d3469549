// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for stockwatch integration tests.
//!
//! Mock collaborators for fast, deterministic tests without Telegram or the
//! network.
//!
//! # Components
//!
//! - [`MockNotifier`] - records sends, edits and deletes; failures can be injected
//! - [`MockFetcher`] - serves canned page bodies or fetch errors per URL
//! - [`LineParser`] - parses `title: stock` lines, one item per line

pub mod mock_fetcher;
pub mod mock_notifier;

pub use mock_fetcher::{LineParser, MockFetcher};
pub use mock_notifier::{MockNotifier, NotifierCall};
