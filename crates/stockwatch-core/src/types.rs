// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the monitor and its adapters.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Identifier of a chat that receives notifications.
///
/// Kept as a string so numeric ids and `@channel` handles both fit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub String);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a message previously sent through a [`Notifier`](crate::Notifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identity of a tracked item: the target URL plus the item title.
///
/// The same logical item yields the same key on every check cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(target_url: &str, title: &str) -> Self {
        Self(format!("{target_url}#{title}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A monitored product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    /// Page URL to fetch.
    pub url: String,

    /// Optional pattern used to find item titles; capture group 1 is the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_regex: Option<String>,
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title_regex: None,
        }
    }

    pub fn with_title_regex(mut self, pattern: impl Into<String>) -> Self {
        self.title_regex = Some(pattern.into());
        self
    }
}

/// One `(title, stock)` pair extracted from a page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub title: String,
    pub stock: u32,
}

impl ParsedItem {
    pub fn new(title: impl Into<String>, stock: u32) -> Self {
        Self {
            title: title.into(),
            stock,
        }
    }
}

/// An inline button attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineButton {
    /// Opens a URL.
    Url { text: String, url: String },
    /// Sends callback data back to the bot.
    Callback { text: String, data: String },
}

impl InlineButton {
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Url {
            text: text.into(),
            url: url.into(),
        }
    }

    pub fn callback(text: impl Into<String>, action: ActionKind) -> Self {
        Self::Callback {
            text: text.into(),
            data: action.to_string(),
        }
    }
}

/// A fully rendered message ready for the notification channel.
///
/// `text` is HTML; adapters send it with HTML parse mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboundMessage {
    pub text: String,
    /// Rows of inline buttons.
    pub buttons: Vec<Vec<InlineButton>>,
    /// `Some(true)` asks for an audible notification, `Some(false)` for a silent one,
    /// `None` leaves the platform default.
    pub notify: Option<bool>,
}

/// Kind of user-initiated action delivered by the inbound feed.
///
/// The string form is the callback payload carried by inline buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Replace any existing summary with a freshly sent one.
    SummaryNew,
    /// Refresh the existing summary in place.
    SummaryRefresh,
}

/// A user action received from the notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAction {
    pub kind: ActionKind,
    pub chat: ChatId,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn item_key_is_stable_for_same_input() {
        let a = ItemKey::new("https://idc.example.com/cart?fid=1", "HK-Mini");
        let b = ItemKey::new("https://idc.example.com/cart?fid=1", "HK-Mini");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://idc.example.com/cart?fid=1#HK-Mini");
    }

    #[test]
    fn item_key_differs_per_target() {
        let a = ItemKey::new("https://a.example.com", "Plan");
        let b = ItemKey::new("https://b.example.com", "Plan");
        assert_ne!(a, b);
    }

    #[test]
    fn action_kind_uses_callback_payload_names() {
        assert_eq!(ActionKind::SummaryNew.to_string(), "SUMMARY_NEW");
        assert_eq!(ActionKind::SummaryRefresh.to_string(), "SUMMARY_REFRESH");
        assert_eq!(
            ActionKind::from_str("SUMMARY_REFRESH").unwrap(),
            ActionKind::SummaryRefresh
        );
        assert!(ActionKind::from_str("SUMMARY_DELETE").is_err());
    }

    #[test]
    fn callback_button_carries_action_payload() {
        let button = InlineButton::callback("Refresh", ActionKind::SummaryRefresh);
        assert_eq!(
            button,
            InlineButton::Callback {
                text: "Refresh".into(),
                data: "SUMMARY_REFRESH".into(),
            }
        );
    }

    #[test]
    fn target_deserializes_without_title_regex() {
        let target: Target = serde_json::from_str(r#"{"url":"https://x.example.com"}"#).unwrap();
        assert_eq!(target, Target::new("https://x.example.com"));
    }

    #[test]
    fn target_rejects_unknown_fields() {
        let result = serde_json::from_str::<Target>(r#"{"url":"https://x","titel":"y"}"#);
        assert!(result.is_err());
    }
}
