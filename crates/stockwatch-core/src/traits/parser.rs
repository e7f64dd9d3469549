// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock parser trait.

use crate::types::ParsedItem;

/// Extracts `(title, stock)` pairs from a page body.
///
/// Parsing is best-effort and never fails: unparsable stock counts become 0
/// and missing titles get a positional placeholder.
pub trait StockParser: Send + Sync {
    fn parse(&self, body: &str, title_pattern: Option<&str>) -> Vec<ParsedItem>;
}
