// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the monitor is written against.
//!
//! Async traits use `#[async_trait]` so they can be held as trait objects.

pub mod fetcher;
pub mod notifier;
pub mod parser;

pub use fetcher::PageFetcher;
pub use notifier::Notifier;
pub use parser::StockParser;
