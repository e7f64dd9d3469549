// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page fetcher trait.

use async_trait::async_trait;

use crate::error::StockwatchError;

/// Fetches the body of a product page.
///
/// Implementations do not retry: the next scheduled check is the retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the page body, or [`StockwatchError::Fetch`] when the page is
    /// unreachable or answers with a non-success status.
    async fn fetch(&self, url: &str) -> Result<String, StockwatchError>;
}
