// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of [`PageFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use stockwatch_config::ScrapeConfig;
use stockwatch_core::{PageFetcher, StockwatchError};
use tracing::debug;

/// Fetches product pages over HTTP.
///
/// Every request carries the configured `User-Agent` and `Accept-Language`
/// headers and is bounded by the configured timeout. Non-2xx answers are
/// reported as [`StockwatchError::Fetch`] with `HTTP <status>` as the message.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, StockwatchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                StockwatchError::Config(format!("invalid scrape.user_agent header value: {e}"))
            })?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| {
                StockwatchError::Config(format!(
                    "invalid scrape.accept_language header value: {e}"
                ))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StockwatchError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, StockwatchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StockwatchError::Fetch {
                url: url.to_string(),
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(url, status = %status, "page response received");

        if !status.is_success() {
            return Err(StockwatchError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
                source: None,
            });
        }

        response.text().await.map_err(|e| StockwatchError::Fetch {
            url: url.to_string(),
            message: format!("failed to read body: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
