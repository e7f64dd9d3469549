// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The check loop.
//!
//! [`Monitor`] owns all mutable state. [`Monitor::run`] interleaves the
//! fixed-interval stock check with inbound user actions in a single task, so
//! every state change is serialized without locks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use stockwatch_config::StockwatchConfig;
use stockwatch_core::{
    ActionKind, ChatId, Notifier, PageFetcher, StockParser, Target, UserAction,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::lifecycle::{LifecycleManager, Timings};
use crate::render::Renderer;
use crate::summary::{Summary, SummaryBuilder};
use crate::tracker::TrackedItem;

/// Counters for one check cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub targets_ok: usize,
    pub targets_failed: usize,
    pub items: usize,
    pub transitions: usize,
    pub summaries_refreshed: usize,
    pub deletes_fired: usize,
}

/// Drives stock checks and user actions against the lifecycle manager.
pub struct Monitor {
    builder: SummaryBuilder,
    chats: Vec<ChatId>,
    lifecycle: LifecycleManager,
    check_interval: Duration,
}

impl Monitor {
    pub fn new(
        config: &StockwatchConfig,
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn StockParser>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_parts(
            SummaryBuilder::new(fetcher, parser, config.targets.clone()),
            config.telegram.chats(),
            LifecycleManager::new(
                notifier,
                Renderer::from_config(&config.monitor),
                Timings::from(&config.monitor),
            ),
            config.monitor.check_interval(),
        )
    }

    pub fn with_parts(
        builder: SummaryBuilder,
        chats: Vec<ChatId>,
        lifecycle: LifecycleManager,
        check_interval: Duration,
    ) -> Self {
        Self {
            builder,
            chats,
            lifecycle,
            check_interval,
        }
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn targets(&self) -> &[Target] {
        self.builder.targets()
    }

    /// One full cycle: fetch every target, apply transitions in target order,
    /// refresh due summaries, then fire due deletes.
    ///
    /// A target that fails to fetch records no observation this cycle.
    pub async fn check_all(&mut self, now: DateTime<Utc>) -> CycleReport {
        let mut report = CycleReport::default();
        let scrapes = self.builder.scrape_all().await;

        for scrape in &scrapes {
            let Ok(items) = &scrape.result else {
                report.targets_failed += 1;
                continue;
            };
            report.targets_ok += 1;

            for parsed in items {
                report.items += 1;
                let item = TrackedItem::new(&scrape.target.url, &parsed.title);
                let transition = self.lifecycle.observe(&item.key, parsed.stock);
                if transition.is_none() {
                    continue;
                }
                report.transitions += 1;
                self.lifecycle
                    .dispatch(&self.chats, &item, transition, now)
                    .await;
            }
        }

        let due = self.lifecycle.due_for_auto_refresh(now);
        if !due.is_empty() {
            let summary = Summary::from_scrapes(&scrapes);
            for chat in &due {
                self.lifecycle.summary_refresh(chat, &summary, now).await;
            }
            report.summaries_refreshed = due.len();
        }

        report.deletes_fired = self.lifecycle.sweep(now).await.len();
        debug!(?report, "check cycle finished");
        report
    }

    /// Handles a summary button press.
    pub async fn handle_action(&mut self, action: UserAction, now: DateTime<Utc>) {
        debug!(chat = %action.chat, kind = %action.kind, "user action");
        let summary = self.builder.build().await;
        match action.kind {
            ActionKind::SummaryNew => self.lifecycle.summary_new(&action.chat, &summary, now).await,
            ActionKind::SummaryRefresh => {
                self.lifecycle
                    .summary_refresh(&action.chat, &summary, now)
                    .await
            }
        }
    }

    /// Runs until `cancel` fires. The cycle or action in flight when it fires
    /// is finished first.
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut feed_open = true;

        info!(
            targets = self.builder.targets().len(),
            chats = self.chats.len(),
            interval = ?self.check_interval,
            "monitor started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.check_all(Utc::now()).await;
                }
                action = actions.recv(), if feed_open => match action {
                    Some(action) => self.handle_action(action, Utc::now()).await,
                    None => {
                        debug!("action feed closed");
                        feed_open = false;
                    }
                },
            }
        }

        info!("monitor stopped");
    }
}
