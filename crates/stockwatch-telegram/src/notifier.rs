// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messages over the Telegram Bot API.

use async_trait::async_trait;
use stockwatch_config::TelegramConfig;
use stockwatch_core::{ChatId, InlineButton, MessageId, Notifier, OutboundMessage, StockwatchError};
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions, ParseMode, Recipient,
};
use teloxide::{ApiError, RequestError};
use tracing::debug;

/// Telegram implementation of [`Notifier`].
///
/// Chat ids are numeric ids or `@channel` usernames; message ids are the
/// decimal Telegram message ids.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    /// Requires `config.bot_token` to be set and non-empty.
    pub fn new(config: &TelegramConfig) -> Result<Self, StockwatchError> {
        let token = config
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StockwatchError::Config("telegram.bot_token is required".into()))?;
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Points the bot at another Bot API server, such as a self-hosted one.
    pub fn with_api_url(mut self, url: reqwest::Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    /// The underlying teloxide bot, shared with the callback feed.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Maps a configured chat id onto a Telegram recipient.
pub fn recipient(chat: &ChatId) -> Result<Recipient, StockwatchError> {
    let raw = chat.0.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(Recipient::Id(teloxide::types::ChatId(id)));
    }
    if raw.len() > 1 && raw.starts_with('@') {
        return Ok(Recipient::ChannelUsername(raw.to_string()));
    }
    Err(StockwatchError::Notify {
        message: format!("invalid chat id `{chat}`"),
        source: None,
    })
}

/// Buy links would otherwise pull in a preview card of the vendor page.
fn no_link_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

fn telegram_message_id(id: &MessageId) -> Result<teloxide::types::MessageId, StockwatchError> {
    id.0.parse::<i32>()
        .map(teloxide::types::MessageId)
        .map_err(|e| StockwatchError::Notify {
            message: format!("invalid message id `{id}`: {e}"),
            source: None,
        })
}

/// Converts button rows into an inline keyboard. `None` for no buttons.
pub fn keyboard(rows: &[Vec<InlineButton>]) -> Result<Option<InlineKeyboardMarkup>, StockwatchError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let mut keyboard = Vec::with_capacity(rows.len());
    for row in rows {
        let mut buttons = Vec::with_capacity(row.len());
        for button in row {
            buttons.push(match button {
                InlineButton::Url { text, url } => {
                    let url = reqwest::Url::parse(url).map_err(|e| StockwatchError::Notify {
                        message: format!("invalid button url `{url}`: {e}"),
                        source: None,
                    })?;
                    InlineKeyboardButton::url(text.clone(), url)
                }
                InlineButton::Callback { text, data } => {
                    InlineKeyboardButton::callback(text.clone(), data.clone())
                }
            });
        }
        keyboard.push(buttons);
    }
    Ok(Some(InlineKeyboardMarkup::new(keyboard)))
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(
        &self,
        chat: &ChatId,
        message: &OutboundMessage,
    ) -> Result<MessageId, StockwatchError> {
        let mut request = self
            .bot
            .send_message(recipient(chat)?, message.text.clone())
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_link_preview());
        if let Some(markup) = keyboard(&message.buttons)? {
            request = request.reply_markup(markup);
        }
        if let Some(notify) = message.notify {
            request = request.disable_notification(!notify);
        }

        let sent = request
            .await
            .map_err(|e| StockwatchError::notify(format!("failed to send message: {e}"), e))?;
        debug!(chat = %chat, message_id = sent.id.0, "telegram message sent");
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn edit(
        &self,
        chat: &ChatId,
        message_id: &MessageId,
        message: &OutboundMessage,
    ) -> Result<(), StockwatchError> {
        let mut request = self
            .bot
            .edit_message_text(
                recipient(chat)?,
                telegram_message_id(message_id)?,
                message.text.clone(),
            )
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_link_preview());
        if let Some(markup) = keyboard(&message.buttons)? {
            request = request.reply_markup(markup);
        }

        match request.await {
            Ok(_) => Ok(()),
            // Identical content is not a failure for callers.
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(StockwatchError::notify(
                format!("failed to edit message: {e}"),
                e,
            )),
        }
    }

    async fn delete(&self, chat: &ChatId, message_id: &MessageId) -> Result<(), StockwatchError> {
        self.bot
            .delete_message(recipient(chat)?, telegram_message_id(message_id)?)
            .await
            .map_err(|e| StockwatchError::notify(format!("failed to delete message: {e}"), e))?;
        Ok(())
    }
}
