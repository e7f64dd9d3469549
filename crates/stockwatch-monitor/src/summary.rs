// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetching all targets and aggregating them into a summary.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use stockwatch_core::{PageFetcher, ParsedItem, StockParser, StockwatchError, Target};
use tracing::{debug, warn};

/// Host labels that name a service rather than the vendor.
const SERVICE_LABELS: &[&str] = &["www", "idc", "shop", "app", "api", "cart", "store"];

/// Upper-cased vendor label for a target URL.
///
/// `https://idc.example.com/cart` gives `EXAMPLE`, `https://vendor.net` gives
/// `VENDOR`. A URL without a recognizable host is returned unchanged.
pub fn brand_of(url: &str) -> String {
    let Some(host) = host_of(url) else {
        return url.to_string();
    };
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let pick = match labels.as_slice() {
        [] => return url.to_string(),
        [first, ..] if labels.len() >= 2 && SERVICE_LABELS.contains(first) => {
            labels[labels.len() - 2]
        }
        [first, ..] => *first,
    };
    pick.to_uppercase()
}

fn host_of(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    };
    (!host.is_empty()).then_some(host)
}

/// Result of fetching and parsing one target.
#[derive(Debug)]
pub struct TargetScrape {
    pub target: Target,
    pub result: Result<Vec<ParsedItem>, StockwatchError>,
}

/// One target's block in a summary: its items, or why it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryBlock {
    pub url: String,
    pub outcome: Result<Vec<ParsedItem>, String>,
}

/// Current stock of every target, grouped by brand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    /// Brand label to blocks, in target order within each brand.
    pub groups: BTreeMap<String, Vec<SummaryBlock>>,
    /// True iff a successfully parsed item has stock above zero.
    pub has_any_stock: bool,
}

impl Summary {
    pub fn from_scrapes(scrapes: &[TargetScrape]) -> Self {
        let mut summary = Summary::default();
        for scrape in scrapes {
            let outcome = match &scrape.result {
                Ok(items) => {
                    summary.has_any_stock |= items.iter().any(|item| item.stock > 0);
                    Ok(items.clone())
                }
                Err(StockwatchError::Fetch { message, .. }) => Err(message.clone()),
                Err(e) => Err(e.to_string()),
            };
            summary
                .groups
                .entry(brand_of(&scrape.target.url))
                .or_default()
                .push(SummaryBlock {
                    url: scrape.target.url.clone(),
                    outcome,
                });
        }
        summary
    }
}

/// Fetches and parses the configured targets.
pub struct SummaryBuilder {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn StockParser>,
    targets: Vec<Target>,
}

impl SummaryBuilder {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn StockParser>,
        targets: Vec<Target>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            targets,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Fetches every target concurrently; results come back in target order.
    pub async fn scrape_all(&self) -> Vec<TargetScrape> {
        let fetches = self.targets.iter().map(|target| async move {
            let result = self
                .fetcher
                .fetch(&target.url)
                .await
                .map(|body| self.parser.parse(&body, target.title_regex.as_deref()));
            match &result {
                Ok(items) => debug!(url = %target.url, items = items.len(), "target parsed"),
                Err(e) => warn!(url = %target.url, error = %e, "target fetch failed"),
            }
            TargetScrape {
                target: target.clone(),
                result,
            }
        });
        join_all(fetches).await
    }

    /// Fetches every target and aggregates the results.
    pub async fn build(&self) -> Summary {
        Summary::from_scrapes(&self.scrape_all().await)
    }
}
