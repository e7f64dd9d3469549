// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockwatch serve`: wires the collaborators together and runs until a
//! shutdown signal arrives.

use std::sync::Arc;

use stockwatch_config::StockwatchConfig;
use stockwatch_core::StockwatchError;
use stockwatch_monitor::Monitor;
use stockwatch_monitor::shutdown::install_signal_handler;
use stockwatch_scrape::{HttpPageFetcher, RegexStockParser};
use stockwatch_telegram::{TelegramNotifier, run_callback_feed};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::keepalive;

/// Capacity of the callback-to-monitor action queue.
const ACTION_BUFFER: usize = 32;

/// Runs the `stockwatch serve` command.
///
/// Starts the Telegram callback feed and, when a port is configured, the
/// keepalive endpoint; then runs the monitor loop. All three stop on the
/// same cancellation token.
pub async fn run_serve(config: StockwatchConfig) -> Result<(), StockwatchError> {
    init_tracing(&config.log_level);

    info!(
        targets = config.targets.len(),
        chats = config.telegram.chat_ids.len(),
        "starting stockwatch serve"
    );

    let fetcher = Arc::new(HttpPageFetcher::new(&config.scrape)?);
    let parser = Arc::new(RegexStockParser::from_config(&config.scrape)?);
    let notifier = TelegramNotifier::new(&config.telegram)?;

    let cancel = install_signal_handler();

    let keepalive = match config.keepalive.port {
        Some(port) => {
            let listener = keepalive::bind(&config.keepalive.bind_address, port).await?;
            Some(tokio::spawn(keepalive::serve(listener, cancel.clone())))
        }
        None => None,
    };

    let (actions_tx, actions_rx) = mpsc::channel(ACTION_BUFFER);
    let feed = tokio::spawn(run_callback_feed(
        notifier.bot().clone(),
        actions_tx,
        cancel.clone(),
    ));

    let monitor = Monitor::new(&config, fetcher, parser, Arc::new(notifier));
    monitor.run(actions_rx, cancel.clone()).await;

    // The monitor only returns on cancellation; make sure the rest follows.
    cancel.cancel();
    if let Err(e) = feed.await {
        warn!(error = %e, "callback feed task failed");
    }
    if let Some(handle) = keepalive {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "keepalive server failed"),
            Err(e) => warn!(error = %e, "keepalive task failed"),
        }
    }

    info!("stockwatch serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stockwatch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
