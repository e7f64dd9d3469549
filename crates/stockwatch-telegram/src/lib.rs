// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter for stockwatch.
//!
//! [`TelegramNotifier`] implements [`Notifier`](stockwatch_core::Notifier)
//! over the Bot API via teloxide with HTML parse mode and inline keyboards.
//! [`run_callback_feed`] long-polls for inline button presses and forwards
//! them as [`UserAction`](stockwatch_core::UserAction)s.

pub mod callbacks;
pub mod notifier;

pub use callbacks::{ack_text, callback_action, run_callback_feed};
pub use notifier::TelegramNotifier;
