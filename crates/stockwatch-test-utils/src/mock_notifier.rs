// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier for deterministic testing.
//!
//! `MockNotifier` implements `Notifier`, hands out sequential message ids and
//! captures every successful call for assertion in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use stockwatch_core::{ChatId, MessageId, Notifier, OutboundMessage, StockwatchError};

/// One successful call made against a [`MockNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Send {
        chat: ChatId,
        message_id: MessageId,
        message: OutboundMessage,
    },
    Edit {
        chat: ChatId,
        message_id: MessageId,
        message: OutboundMessage,
    },
    Delete {
        chat: ChatId,
        message_id: MessageId,
    },
}

/// A mock notification channel for testing.
///
/// Message ids are `mock-msg-1`, `mock-msg-2`, ... in send order. Failures
/// are toggled per operation and counted instead of logged as calls.
#[derive(Default)]
pub struct MockNotifier {
    calls: Arc<Mutex<Vec<NotifierCall>>>,
    next_id: AtomicU64,
    failures: AtomicUsize,
    fail_sends: AtomicBool,
    fail_edits: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `send` fail (or succeed again).
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// All successful calls, in order.
    pub async fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().await.clone()
    }

    /// Successful sends as `(chat, id, message)`.
    pub async fn sent(&self) -> Vec<(ChatId, MessageId, OutboundMessage)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                NotifierCall::Send {
                    chat,
                    message_id,
                    message,
                } => Some((chat.clone(), message_id.clone(), message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Successful edits as `(chat, id, message)`.
    pub async fn edited(&self) -> Vec<(ChatId, MessageId, OutboundMessage)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                NotifierCall::Edit {
                    chat,
                    message_id,
                    message,
                } => Some((chat.clone(), message_id.clone(), message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Successful deletes as `(chat, id)`.
    pub async fn deleted(&self) -> Vec<(ChatId, MessageId)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                NotifierCall::Delete { chat, message_id } => {
                    Some((chat.clone(), message_id.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Number of calls that were rejected by an injected failure.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Forget recorded calls. Id numbering continues.
    pub async fn clear(&self) {
        self.calls.lock().await.clear();
    }

    fn injected_failure(&self, op: &str) -> StockwatchError {
        self.failures.fetch_add(1, Ordering::SeqCst);
        StockwatchError::Notify {
            message: format!("mock {op} failure"),
            source: None,
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
    }

    async fn send(
        &self,
        chat: &ChatId,
        message: &OutboundMessage,
    ) -> Result<MessageId, StockwatchError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(self.injected_failure("send"));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = MessageId(format!("mock-msg-{n}"));
        self.calls.lock().await.push(NotifierCall::Send {
            chat: chat.clone(),
            message_id: message_id.clone(),
            message: message.clone(),
        });
        Ok(message_id)
    }

    async fn edit(
        &self,
        chat: &ChatId,
        message_id: &MessageId,
        message: &OutboundMessage,
    ) -> Result<(), StockwatchError> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(self.injected_failure("edit"));
        }
        self.calls.lock().await.push(NotifierCall::Edit {
            chat: chat.clone(),
            message_id: message_id.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    async fn delete(&self, chat: &ChatId, message_id: &MessageId) -> Result<(), StockwatchError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(self.injected_failure("delete"));
        }
        self.calls.lock().await.push(NotifierCall::Delete {
            chat: chat.clone(),
            message_id: message_id.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(t: &str) -> OutboundMessage {
        OutboundMessage {
            text: t.to_string(),
            ..OutboundMessage::default()
        }
    }

    #[tokio::test]
    async fn send_assigns_sequential_ids() {
        let notifier = MockNotifier::new();
        let chat = ChatId::from("1");
        let a = notifier.send(&chat, &text("a")).await.unwrap();
        let b = notifier.send(&chat, &text("b")).await.unwrap();
        assert_eq!(a, MessageId("mock-msg-1".into()));
        assert_eq!(b, MessageId("mock-msg-2".into()));
        assert_eq!(notifier.sent().await.len(), 2);
    }

    #[tokio::test]
    async fn injected_failures_are_counted_not_recorded() {
        let notifier = MockNotifier::new();
        let chat = ChatId::from("1");
        notifier.set_fail_sends(true);
        assert!(notifier.send(&chat, &text("a")).await.is_err());
        assert!(notifier.calls().await.is_empty());
        assert_eq!(notifier.failure_count(), 1);

        notifier.set_fail_sends(false);
        assert!(notifier.send(&chat, &text("a")).await.is_ok());
    }

    #[tokio::test]
    async fn edits_and_deletes_are_recorded() {
        let notifier = MockNotifier::new();
        let chat = ChatId::from("1");
        let id = notifier.send(&chat, &text("a")).await.unwrap();
        notifier.edit(&chat, &id, &text("b")).await.unwrap();
        notifier.delete(&chat, &id).await.unwrap();

        assert_eq!(notifier.edited().await[0].2.text, "b");
        assert_eq!(notifier.deleted().await, vec![(chat, id)]);
    }
}
