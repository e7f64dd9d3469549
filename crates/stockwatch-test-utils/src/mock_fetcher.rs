// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock page fetcher and a trivial line-based parser.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use stockwatch_core::{PageFetcher, ParsedItem, StockParser, StockwatchError};

enum Page {
    Body(String),
    Error(String),
}

/// Serves canned bodies per URL. Unknown URLs fail with `HTTP 404`.
#[derive(Default)]
pub struct MockFetcher {
    pages: Mutex<HashMap<String, Page>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url` from now on.
    pub async fn set_page(&self, url: &str, body: impl Into<String>) {
        self.pages
            .lock()
            .await
            .insert(url.to_string(), Page::Body(body.into()));
    }

    /// Fail every fetch of `url` with `message`.
    pub async fn fail_page(&self, url: &str, message: impl Into<String>) {
        self.pages
            .lock()
            .await
            .insert(url.to_string(), Page::Error(message.into()));
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, StockwatchError> {
        let message = match self.pages.lock().await.get(url) {
            Some(Page::Body(body)) => return Ok(body.clone()),
            Some(Page::Error(message)) => message.clone(),
            None => "HTTP 404".to_string(),
        };
        Err(StockwatchError::Fetch {
            url: url.to_string(),
            message,
            source: None,
        })
    }
}

/// Parses bodies of the form `title: stock`, one item per line.
///
/// Lines without a colon are skipped; unparsable stock becomes 0. The title
/// pattern is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl StockParser for LineParser {
    fn parse(&self, body: &str, _title_pattern: Option<&str>) -> Vec<ParsedItem> {
        body.lines()
            .filter_map(|line| line.rsplit_once(':'))
            .map(|(title, stock)| ParsedItem {
                title: title.trim().to_string(),
                stock: stock.trim().parse().unwrap_or(0),
            })
            .collect()
    }
}
