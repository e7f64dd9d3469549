// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred message deletion.
//!
//! Entries are plain data swept once per check cycle, so the schedule can be
//! inspected and driven with explicit timestamps. Resolution is bounded by
//! the check interval.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use stockwatch_core::{ChatId, ItemKey, MessageId, Notifier};
use strum::{AsRefStr, Display};
use tracing::{debug, warn};

/// Why a message is scheduled for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DeleteKind {
    /// A sold-out notice past its grace period.
    SoldOut,
    /// A restock notice that saw no change for the idle window.
    RestockIdle,
    /// A summary that showed no stock for the all-zero grace period.
    Summary,
}

/// One pending deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredDelete {
    pub chat: ChatId,
    pub message_id: MessageId,
    pub due: DateTime<Utc>,
    pub kind: DeleteKind,
    pub key: Option<ItemKey>,
}

impl DeferredDelete {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }
}

/// Pending deletions in insertion order.
#[derive(Debug, Default)]
pub struct DeferredScheduler {
    entries: Vec<DeferredDelete>,
}

impl DeferredScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry due `delay` after `now`.
    pub fn schedule(
        &mut self,
        chat: ChatId,
        message_id: MessageId,
        delay: Duration,
        kind: DeleteKind,
        key: Option<ItemKey>,
        now: DateTime<Utc>,
    ) {
        let due = TimeDelta::from_std(delay)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        debug!(chat = %chat, message_id = %message_id, kind = %kind, %due, "delete scheduled");
        self.entries.push(DeferredDelete {
            chat,
            message_id,
            due,
            kind,
            key,
        });
    }

    /// Removes every entry matching `predicate` and returns how many were removed.
    pub fn cancel(&mut self, predicate: impl Fn(&DeferredDelete) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(entry));
        before - self.entries.len()
    }

    /// Removes and returns the entries due at `now`; later ones stay untouched.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<DeferredDelete> {
        let (due, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.is_due(now));
        self.entries = keep;
        due
    }

    /// Deletes every due message through `notifier` and drops those entries
    /// whether or not the delete succeeded. Returns the fired entries.
    pub async fn sweep(
        &mut self,
        now: DateTime<Utc>,
        notifier: &dyn Notifier,
    ) -> Vec<DeferredDelete> {
        let due = self.take_due(now);
        for entry in &due {
            match notifier.delete(&entry.chat, &entry.message_id).await {
                Ok(()) => debug!(
                    chat = %entry.chat,
                    message_id = %entry.message_id,
                    kind = %entry.kind,
                    "scheduled delete fired"
                ),
                Err(e) => warn!(
                    chat = %entry.chat,
                    message_id = %entry.message_id,
                    kind = %entry.kind,
                    error = %e,
                    "scheduled delete failed, dropping entry"
                ),
            }
        }
        due
    }

    /// Pending entries in insertion order.
    pub fn pending(&self) -> &[DeferredDelete] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
