// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-polling feed of inline button presses.

use std::str::FromStr;
use std::time::Duration;

use stockwatch_core::{ActionKind, ChatId, UserAction};
use teloxide::RequestError;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Maps callback data and the originating chat onto a [`UserAction`].
///
/// Unknown payloads and callbacks without an accessible chat yield `None`.
pub fn callback_action(data: Option<&str>, chat: Option<i64>) -> Option<UserAction> {
    let kind = ActionKind::from_str(data?.trim()).ok()?;
    Some(UserAction {
        kind,
        chat: ChatId(chat?.to_string()),
    })
}

/// Toast shown to the presser when the callback is acknowledged.
pub fn ack_text(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::SummaryNew => "Building a new summary…",
        ActionKind::SummaryRefresh => "Refreshed",
    }
}

/// First delay before polling is restarted after a failure.
const RETRY_INITIAL: Duration = Duration::from_secs(1);
/// Upper bound for the restart delay.
const RETRY_MAX: Duration = Duration::from_secs(60);

/// Polls Telegram for callback queries until `cancel` fires.
///
/// Every query is answered right away so the client stops spinning; the
/// decoded action is forwarded on `actions`. Other update kinds are dropped.
/// A failed start (for example `getMe` unreachable) is retried with
/// exponential backoff, so the feed only ends on cancellation.
pub async fn run_callback_feed(
    bot: Bot,
    actions: mpsc::Sender<UserAction>,
    cancel: CancellationToken,
) {
    info!("starting Telegram callback polling");
    let mut delay = RETRY_INITIAL;

    loop {
        match poll_until_stopped(bot.clone(), actions.clone(), &cancel).await {
            Ok(()) if cancel.is_cancelled() => break,
            Ok(()) => {
                warn!(retry_in = ?RETRY_INITIAL, "callback polling ended unexpectedly");
                delay = RETRY_INITIAL;
            }
            Err(e) => warn!(error = %e, retry_in = ?delay, "callback polling failed"),
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = (delay * 2).min(RETRY_MAX);
    }

    info!("Telegram callback polling stopped");
}

/// One dispatcher lifetime: start polling and run until it stops or `cancel`
/// fires.
///
/// Cancellation before dispatching has started abandons the startup calls;
/// afterwards the dispatcher is shut down and allowed to finish in-flight
/// updates.
async fn poll_until_stopped(
    bot: Bot,
    actions: mpsc::Sender<UserAction>,
    cancel: &CancellationToken,
) -> Result<(), RequestError> {
    let handler = Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let actions = actions.clone();
        async move {
            let chat = q.message.as_ref().map(|m| m.chat().id.0);
            let action = callback_action(q.data.as_deref(), chat);

            let mut answer = bot.answer_callback_query(q.id.clone());
            if let Some(action) = &action {
                answer = answer.text(ack_text(action.kind));
            }
            if let Err(e) = answer.await {
                warn!(error = %e, "failed to answer callback query");
            }

            match action {
                Some(action) => {
                    debug!(kind = %action.kind, chat = %action.chat, "callback received");
                    if actions.send(action).await.is_err() {
                        warn!("action channel closed, dropping callback");
                    }
                }
                None => debug!(data = ?q.data, "ignoring unknown callback"),
            }
            respond(())
        }
    });

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .default_handler(|_| async {})
        .build();
    let shutdown = dispatcher.shutdown_token();

    let polling = async {
        let listener = update_listeners::polling_default(bot).await;
        dispatcher
            .try_dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("callback update listener error"),
            )
            .await
    };
    tokio::pin!(polling);

    tokio::select! {
        result = &mut polling => return result,
        _ = cancel.cancelled() => {}
    }

    match shutdown.shutdown() {
        Ok(done) => {
            let (result, ()) = tokio::join!(polling, done);
            result
        }
        // Still in getMe or webhook cleanup: nothing is in flight yet.
        Err(_) => Ok(()),
    }
}
