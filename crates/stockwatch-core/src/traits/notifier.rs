// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for the outbound chat channel (Telegram, etc.).

use async_trait::async_trait;

use crate::error::StockwatchError;
use crate::types::{ChatId, MessageId, OutboundMessage};

/// Outbound notification channel.
///
/// Every failure is reported as [`StockwatchError::Notify`]; callers in the
/// monitor treat these calls as fire-and-forget and never propagate them.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Sends a new message and returns its identifier.
    async fn send(
        &self,
        chat: &ChatId,
        message: &OutboundMessage,
    ) -> Result<MessageId, StockwatchError>;

    /// Replaces the content of a previously sent message.
    async fn edit(
        &self,
        chat: &ChatId,
        message_id: &MessageId,
        message: &OutboundMessage,
    ) -> Result<(), StockwatchError>;

    /// Deletes a previously sent message.
    async fn delete(&self, chat: &ChatId, message_id: &MessageId) -> Result<(), StockwatchError>;
}
