// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockwatch check`: one fetch+parse pass, printed to stdout.

use std::fmt::Write;
use std::sync::Arc;

use stockwatch_config::StockwatchConfig;
use stockwatch_core::StockwatchError;
use stockwatch_monitor::{SummaryBuilder, TargetScrape};
use stockwatch_scrape::{HttpPageFetcher, RegexStockParser};

pub async fn run_check(config: &StockwatchConfig) -> Result<(), StockwatchError> {
    let builder = SummaryBuilder::new(
        Arc::new(HttpPageFetcher::new(&config.scrape)?),
        Arc::new(RegexStockParser::from_config(&config.scrape)?),
        config.targets.clone(),
    );
    print!("{}", format_report(&builder.scrape_all().await));
    Ok(())
}

/// One block per target, in configured order.
pub fn format_report(scrapes: &[TargetScrape]) -> String {
    let mut out = String::new();
    for scrape in scrapes {
        let _ = writeln!(out, "{}", scrape.target.url);
        match &scrape.result {
            Ok(items) if items.is_empty() => {
                let _ = writeln!(out, "  (no stock markers found)");
            }
            Ok(items) => {
                for item in items {
                    let _ = writeln!(out, "  {}: {}", item.title, item.stock);
                }
            }
            Err(e) => {
                let _ = writeln!(out, "  error: {e}");
            }
        }
    }
    out
}
