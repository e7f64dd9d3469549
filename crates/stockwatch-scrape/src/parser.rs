// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regex-based implementation of [`StockParser`].
//!
//! Each match of the stock pattern is one item. Its title is resolved, in
//! order, from:
//!
//! 1. the target's title pattern applied to the text around the stock marker
//!    (2000 bytes before to 400 bytes after), taking capture group 1 of the
//!    match nearest before the marker;
//! 2. the n-th match of the title pattern over the whole page, where n is the
//!    item's position (group 1, else the whole match);
//! 3. a heading, a `card-title`/`product-title`/`plan-name` div or a
//!    `data-title` attribute in the 1000 bytes before the marker;
//! 4. the placeholder `Item #<n>`.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use stockwatch_config::ScrapeConfig;
use stockwatch_core::{ParsedItem, StockParser, StockwatchError};
use tracing::debug;

const LOCAL_BEFORE: usize = 2000;
const LOCAL_AFTER: usize = 400;
const CONTAINER_BEFORE: usize = 1000;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<h[1-6][^>]*>\s*([^<]{2,80})</h[1-6]>").expect("valid regex")
});

static TITLE_DIV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<div[^>]*class=["'][^"']*(?:card-title|product-title|plan-name)[^"']*["'][^>]*>\s*([^<]{2,120})</div>"#,
    )
    .expect("valid regex")
});

static DATA_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)data-title=["']([^"']{2,120})["']"#).expect("valid regex"));

/// Extracts items by scanning for stock markers such as `库存：12`.
#[derive(Debug, Clone)]
pub struct RegexStockParser {
    stock_re: Regex,
}

impl RegexStockParser {
    /// Builds a parser from a stock pattern whose capture group 1 is the count.
    pub fn new(stock_pattern: &str) -> Result<Self, StockwatchError> {
        let stock_re = RegexBuilder::new(stock_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| StockwatchError::Config(format!("invalid stock pattern: {e}")))?;
        Ok(Self { stock_re })
    }

    pub fn from_config(config: &ScrapeConfig) -> Result<Self, StockwatchError> {
        Self::new(&config.stock_pattern)
    }
}

impl StockParser for RegexStockParser {
    fn parse(&self, body: &str, title_pattern: Option<&str>) -> Vec<ParsedItem> {
        let title_re = title_pattern.and_then(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| debug!(pattern, error = %e, "ignoring invalid title pattern"))
                .ok()
        });

        let global_titles: Vec<String> = title_re
            .as_ref()
            .map(|re| {
                re.captures_iter(body)
                    .map(|caps| {
                        caps.get(1)
                            .or_else(|| caps.get(0))
                            .map(|m| m.as_str().trim().to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .unwrap_or_default();

        self.stock_re
            .captures_iter(body)
            .enumerate()
            .map(|(index, caps)| {
                let pos = caps.get(0).map_or(0, |m| m.start());
                let stock = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .unwrap_or(0);

                let title = title_re
                    .as_ref()
                    .and_then(|re| local_title(re, body, pos))
                    .or_else(|| {
                        global_titles
                            .get(index)
                            .filter(|t| !t.is_empty())
                            .cloned()
                    })
                    .or_else(|| container_title(body, pos))
                    .unwrap_or_else(|| format!("Item #{}", index + 1));

                ParsedItem { title, stock }
            })
            .collect()
    }
}

/// Capture group 1 of the match of `re` closest before the marker at `pos`,
/// or the first match after it when none precedes it.
fn local_title(re: &Regex, body: &str, pos: usize) -> Option<String> {
    let start = floor_boundary(body, pos.saturating_sub(LOCAL_BEFORE));
    let end = floor_boundary(body, pos.saturating_add(LOCAL_AFTER).min(body.len()));
    let marker = pos - start;

    let titles: Vec<(usize, &str)> = re
        .captures_iter(&body[start..end])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = caps.get(1)?.as_str().trim();
            (!title.is_empty()).then_some((whole.start(), title))
        })
        .collect();

    titles
        .iter()
        .rev()
        .find(|(at, _)| *at < marker)
        .or_else(|| titles.first())
        .map(|(_, title)| title.to_string())
}

/// Common title containers in the text just before the marker at `pos`.
fn container_title(body: &str, pos: usize) -> Option<String> {
    let start = floor_boundary(body, pos.saturating_sub(CONTAINER_BEFORE));
    let window = &body[start..pos];
    [&*HEADING_RE, &*TITLE_DIV_RE, &*DATA_TITLE_RE]
        .into_iter()
        .find_map(|re| re.captures(window).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Largest char boundary in `s` that is `<= index`.
fn floor_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
