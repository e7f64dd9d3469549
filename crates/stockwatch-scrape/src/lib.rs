// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page scraping for stockwatch.
//!
//! [`HttpPageFetcher`] downloads product pages with browser-like headers and
//! [`RegexStockParser`] pulls `(title, stock)` pairs out of the HTML.

pub mod fetcher;
pub mod parser;

pub use fetcher::HttpPageFetcher;
pub use parser::RegexStockParser;
