// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification lifecycle.
//!
//! [`LifecycleManager`] is the only writer of the active-message maps and the
//! only producer of deferred deletes. It reacts to item transitions and to
//! summary requests, and every notifier failure is logged and swallowed so the
//! check loop keeps running.
//!
//! Rules, per chat:
//!
//! - sold out: delete the active restock message first, then send a sold-out
//!   notice that deletes itself after the grace period;
//! - restocked: send once per in-stock run and arm the idle delete;
//! - changed while in stock: edit the active restock message (resend if the
//!   edit fails) and restart the idle delete;
//! - summaries: at most one per chat, edited in place on refresh, deleted
//!   after the all-zero grace period unless a later refresh shows stock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use stockwatch_config::MonitorConfig;
use stockwatch_core::{ChatId, ItemKey, MessageId, Notifier, OutboundMessage};
use tracing::{debug, info, warn};

use crate::render::{Notice, Renderer};
use crate::scheduler::{DeferredDelete, DeferredScheduler, DeleteKind};
use crate::summary::Summary;
use crate::tracker::{ItemTracker, TrackedItem, Transition};

/// Delays applied by the lifecycle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long a sold-out notice stays up.
    pub soldout_grace: Duration,
    /// How long a restock notice stays up without a change.
    pub restock_idle: Duration,
    /// How often an active summary is refreshed automatically.
    pub summary_refresh: Duration,
    /// How long an all-zero summary stays up.
    pub summary_all_zero: Duration,
}

impl From<&MonitorConfig> for Timings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            soldout_grace: config.soldout_delete_after(),
            restock_idle: config.restock_idle_delete(),
            summary_refresh: config.summary_refresh(),
            summary_all_zero: config.summary_delete_if_all_zero(),
        }
    }
}

/// Owns item state, active messages and the deletion schedule.
pub struct LifecycleManager {
    notifier: Arc<dyn Notifier>,
    renderer: Renderer,
    timings: Timings,
    tracker: ItemTracker,
    restock_messages: HashMap<(ChatId, ItemKey), MessageId>,
    summary_messages: HashMap<ChatId, MessageId>,
    summary_refreshed_at: HashMap<ChatId, DateTime<Utc>>,
    scheduler: DeferredScheduler,
}

impl LifecycleManager {
    pub fn new(notifier: Arc<dyn Notifier>, renderer: Renderer, timings: Timings) -> Self {
        Self {
            notifier,
            renderer,
            timings,
            tracker: ItemTracker::new(),
            restock_messages: HashMap::new(),
            summary_messages: HashMap::new(),
            summary_refreshed_at: HashMap::new(),
            scheduler: DeferredScheduler::new(),
        }
    }

    /// Records a stock reading and classifies it.
    pub fn observe(&mut self, key: &ItemKey, stock: u32) -> Transition {
        self.tracker.observe(key, stock)
    }

    /// Applies the rules for `transition` to every chat.
    pub async fn dispatch(
        &mut self,
        chats: &[ChatId],
        item: &TrackedItem,
        transition: Transition,
        now: DateTime<Utc>,
    ) {
        match transition {
            Transition::None => {}
            Transition::SoldOut { previous } => {
                info!(key = %item.key, previous, "item sold out");
                self.on_sold_out(chats, item, previous, now).await;
            }
            Transition::Restocked { previous, current } => {
                info!(key = %item.key, current, "item restocked");
                self.on_restocked(chats, item, previous, current, now).await;
            }
            Transition::InStockChanged { previous, current } => {
                info!(key = %item.key, previous, current, "in-stock count changed");
                self.on_in_stock_changed(chats, item, previous, current, now)
                    .await;
            }
        }
    }

    pub async fn on_sold_out(
        &mut self,
        chats: &[ChatId],
        item: &TrackedItem,
        previous: u32,
        now: DateTime<Utc>,
    ) {
        let message = self
            .renderer
            .render(&Notice::SoldOut { item, previous }, now);

        for chat in chats {
            if let Some(old) = self.restock_messages.remove(&(chat.clone(), item.key.clone())) {
                match self.notifier.delete(chat, &old).await {
                    Ok(()) => {
                        debug!(chat = %chat, message_id = %old, "restock message deleted");
                        self.cancel_restock_idle(chat, &item.key);
                    }
                    // The idle delete is left armed as a second attempt.
                    Err(e) => warn!(chat = %chat, message_id = %old, error = %e, "failed to delete restock message"),
                }
            }

            match self.notifier.send(chat, &message).await {
                Ok(id) => {
                    debug!(chat = %chat, message_id = %id, "sold-out notice sent");
                    self.scheduler.schedule(
                        chat.clone(),
                        id,
                        self.timings.soldout_grace,
                        DeleteKind::SoldOut,
                        None,
                        now,
                    );
                }
                Err(e) => warn!(chat = %chat, key = %item.key, error = %e, "failed to send sold-out notice"),
            }
        }

        self.tracker.set_in_stock_notified(&item.key, false);
    }

    /// Sends one restock notice per chat unless this in-stock run was
    /// already announced.
    ///
    /// The flag is checked once before the loop and set once after it, even
    /// when some sends failed.
    pub async fn on_restocked(
        &mut self,
        chats: &[ChatId],
        item: &TrackedItem,
        previous: u32,
        current: u32,
        now: DateTime<Utc>,
    ) {
        if self.tracker.in_stock_notified(&item.key) {
            debug!(key = %item.key, "restock already announced for this run");
            return;
        }

        let message = self.renderer.render(
            &Notice::Restock {
                item,
                previous,
                current,
            },
            now,
        );

        for chat in chats {
            match self.notifier.send(chat, &message).await {
                Ok(id) => {
                    debug!(chat = %chat, message_id = %id, "restock notice sent");
                    self.restock_messages
                        .insert((chat.clone(), item.key.clone()), id.clone());
                    self.arm_restock_idle(chat, &item.key, id, now);
                }
                Err(e) => warn!(chat = %chat, key = %item.key, error = %e, "failed to send restock notice"),
            }
        }

        self.tracker.set_in_stock_notified(&item.key, true);
    }

    /// Updates the active restock message in chats that have one.
    pub async fn on_in_stock_changed(
        &mut self,
        chats: &[ChatId],
        item: &TrackedItem,
        previous: u32,
        current: u32,
        now: DateTime<Utc>,
    ) {
        let message = OutboundMessage {
            notify: None,
            ..self.renderer.render(
                &Notice::Restock {
                    item,
                    previous,
                    current,
                },
                now,
            )
        };

        for chat in chats {
            let slot = (chat.clone(), item.key.clone());
            let Some(active) = self.restock_messages.get(&slot).cloned() else {
                continue;
            };

            if let Err(e) = self.notifier.edit(chat, &active, &message).await {
                warn!(chat = %chat, message_id = %active, error = %e, "restock edit failed, resending");
                match self.notifier.send(chat, &message).await {
                    Ok(id) => {
                        self.restock_messages.insert(slot.clone(), id);
                    }
                    Err(e) => warn!(chat = %chat, key = %item.key, error = %e, "failed to resend restock notice"),
                }
            }

            if let Some(current_id) = self.restock_messages.get(&slot).cloned() {
                self.arm_restock_idle(chat, &item.key, current_id, now);
            }
        }
    }

    /// Replaces any summary in `chat` with a freshly sent one.
    pub async fn summary_new(&mut self, chat: &ChatId, summary: &Summary, now: DateTime<Utc>) {
        if let Some(old) = self.summary_messages.remove(chat) {
            if let Err(e) = self.notifier.delete(chat, &old).await {
                warn!(chat = %chat, message_id = %old, error = %e, "failed to delete old summary");
            }
            self.cancel_summary_delete(chat);
        }

        let message = self.renderer.render(&Notice::Summary(summary), now);
        self.send_summary(chat, &message, summary.has_any_stock, now)
            .await;
    }

    /// Refreshes the summary in `chat` in place, sending a new one when there
    /// is none or the edit fails.
    pub async fn summary_refresh(&mut self, chat: &ChatId, summary: &Summary, now: DateTime<Utc>) {
        let message = self.renderer.render(&Notice::Summary(summary), now);

        if let Some(active) = self.summary_messages.get(chat).cloned() {
            match self.notifier.edit(chat, &active, &message).await {
                Ok(()) => {
                    debug!(chat = %chat, message_id = %active, "summary refreshed");
                    self.summary_refreshed_at.insert(chat.clone(), now);
                    self.apply_summary_delete_policy(chat, active, summary.has_any_stock, now);
                    return;
                }
                Err(e) => {
                    warn!(chat = %chat, message_id = %active, error = %e, "summary edit failed, resending");
                }
            }
        }

        let replaced = self.summary_messages.get(chat).cloned();
        let sent = self
            .send_summary(chat, &message, summary.has_any_stock, now)
            .await;
        // A failed attempt still counts, so the next one waits a full interval.
        self.summary_refreshed_at.insert(chat.clone(), now);

        if let (true, Some(old)) = (sent, replaced) {
            // It may already be gone, which is why the edit failed.
            if let Err(e) = self.notifier.delete(chat, &old).await {
                debug!(chat = %chat, message_id = %old, error = %e, "failed to delete replaced summary");
            }
        }
    }

    /// Chats whose active summary is due for an automatic refresh.
    pub fn due_for_auto_refresh(&self, now: DateTime<Utc>) -> Vec<ChatId> {
        let interval = TimeDelta::from_std(self.timings.summary_refresh).unwrap_or(TimeDelta::MAX);
        let mut due: Vec<ChatId> = self
            .summary_messages
            .keys()
            .filter(|chat| {
                self.summary_refreshed_at
                    .get(*chat)
                    .is_none_or(|at| now.signed_duration_since(*at) >= interval)
            })
            .cloned()
            .collect();
        due.sort();
        due
    }

    /// Fires due deletes and forgets active messages they removed.
    pub async fn sweep(&mut self, now: DateTime<Utc>) -> Vec<DeferredDelete> {
        let fired = self.scheduler.sweep(now, self.notifier.as_ref()).await;
        for entry in &fired {
            self.restock_messages
                .retain(|(chat, _), id| !(chat == &entry.chat && id == &entry.message_id));
            if self.summary_messages.get(&entry.chat) == Some(&entry.message_id) {
                self.summary_messages.remove(&entry.chat);
                self.summary_refreshed_at.remove(&entry.chat);
            }
        }
        fired
    }

    pub fn active_restock_message(&self, chat: &ChatId, key: &ItemKey) -> Option<&MessageId> {
        self.restock_messages.get(&(chat.clone(), key.clone()))
    }

    pub fn active_summary_message(&self, chat: &ChatId) -> Option<&MessageId> {
        self.summary_messages.get(chat)
    }

    pub fn last_summary_refresh(&self, chat: &ChatId) -> Option<DateTime<Utc>> {
        self.summary_refreshed_at.get(chat).copied()
    }

    pub fn pending_deletes(&self) -> &[DeferredDelete] {
        self.scheduler.pending()
    }

    pub fn tracker(&self) -> &ItemTracker {
        &self.tracker
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Sends a summary and records it. Returns whether the send succeeded.
    async fn send_summary(
        &mut self,
        chat: &ChatId,
        message: &OutboundMessage,
        has_any_stock: bool,
        now: DateTime<Utc>,
    ) -> bool {
        match self.notifier.send(chat, message).await {
            Ok(id) => {
                debug!(chat = %chat, message_id = %id, "summary sent");
                self.summary_messages.insert(chat.clone(), id.clone());
                self.summary_refreshed_at.insert(chat.clone(), now);
                self.apply_summary_delete_policy(chat, id, has_any_stock, now);
                true
            }
            Err(e) => {
                warn!(chat = %chat, error = %e, "failed to send summary");
                false
            }
        }
    }

    /// Any refresh cancels the pending summary delete; an all-zero one arms a new one.
    fn apply_summary_delete_policy(
        &mut self,
        chat: &ChatId,
        message_id: MessageId,
        has_any_stock: bool,
        now: DateTime<Utc>,
    ) {
        self.cancel_summary_delete(chat);
        if !has_any_stock {
            self.scheduler.schedule(
                chat.clone(),
                message_id,
                self.timings.summary_all_zero,
                DeleteKind::Summary,
                None,
                now,
            );
        }
    }

    fn cancel_summary_delete(&mut self, chat: &ChatId) {
        self.scheduler
            .cancel(|e| e.kind == DeleteKind::Summary && &e.chat == chat);
    }

    /// Replaces the idle delete for `(chat, key)` with one for the full window.
    fn arm_restock_idle(
        &mut self,
        chat: &ChatId,
        key: &ItemKey,
        message_id: MessageId,
        now: DateTime<Utc>,
    ) {
        self.cancel_restock_idle(chat, key);
        self.scheduler.schedule(
            chat.clone(),
            message_id,
            self.timings.restock_idle,
            DeleteKind::RestockIdle,
            Some(key.clone()),
            now,
        );
    }

    fn cancel_restock_idle(&mut self, chat: &ChatId, key: &ItemKey) {
        self.scheduler.cancel(|e| {
            e.kind == DeleteKind::RestockIdle && &e.chat == chat && e.key.as_ref() == Some(key)
        });
    }
}
