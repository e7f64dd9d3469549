// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification content.
//!
//! Rendering is pure: a [`Notice`] plus a timestamp always produces the same
//! [`OutboundMessage`]. Text is Telegram-flavoured HTML with every dynamic
//! value escaped.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use stockwatch_config::MonitorConfig;
use stockwatch_core::{ActionKind, InlineButton, OutboundMessage};

use crate::summary::Summary;
use crate::tracker::TrackedItem;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Content to render.
#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    /// Item is in stock: a fresh restock or a change while in stock.
    Restock {
        item: &'a TrackedItem,
        previous: u32,
        current: u32,
    },
    SoldOut {
        item: &'a TrackedItem,
        previous: u32,
    },
    Summary(&'a Summary),
}

/// Renders notices with a banner and a display timezone.
#[derive(Debug, Clone)]
pub struct Renderer {
    banner: String,
    offset: FixedOffset,
    refresh_every: Duration,
}

impl Renderer {
    /// An out-of-range `utc_offset_hours` falls back to UTC.
    pub fn new(banner: impl Into<String>, utc_offset_hours: i32, refresh_every: Duration) -> Self {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self {
            banner: banner.into(),
            offset,
            refresh_every,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            config.banner.clone(),
            config.display_utc_offset_hours,
            config.summary_refresh(),
        )
    }

    /// `YYYY-MM-DD HH:MM:SS` in the display timezone.
    pub fn timestamp(&self, now: DateTime<Utc>) -> String {
        now.with_timezone(&self.offset)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    pub fn render(&self, notice: &Notice<'_>, now: DateTime<Utc>) -> OutboundMessage {
        match *notice {
            Notice::Restock {
                item,
                previous,
                current,
            } => OutboundMessage {
                text: self.item_text(
                    "Stock change",
                    item,
                    &format!("🟢 <b>Status:</b> in stock    📦 <b>Stock:</b> {current}"),
                    previous,
                    current,
                    now,
                ),
                buttons: vec![
                    vec![InlineButton::url("🛒 Buy now", &item.url)],
                    vec![InlineButton::callback("📊 View summary", ActionKind::SummaryNew)],
                ],
                notify: Some(true),
            },
            Notice::SoldOut { item, previous } => OutboundMessage {
                text: self.item_text(
                    "Sold out",
                    item,
                    "🔴 <b>Status:</b> sold out    📦 <b>Stock:</b> 0",
                    previous,
                    0,
                    now,
                ),
                buttons: vec![vec![InlineButton::callback(
                    "📊 View summary",
                    ActionKind::SummaryNew,
                )]],
                notify: Some(true),
            },
            Notice::Summary(summary) => OutboundMessage {
                text: self.summary_text(summary, now),
                buttons: vec![vec![InlineButton::callback(
                    "🔄 Refresh",
                    ActionKind::SummaryRefresh,
                )]],
                notify: None,
            },
        }
    }

    fn header(&self, title: &str) -> String {
        format!(
            "🧩 <b>{}</b> | <b>{}</b>\n{RULE}",
            escape_html(&self.banner),
            title
        )
    }

    fn item_text(
        &self,
        title: &str,
        item: &TrackedItem,
        status: &str,
        previous: u32,
        current: u32,
        now: DateTime<Utc>,
    ) -> String {
        format!(
            "{}\n• <b>Vendor:</b> {}\n• <b>Item:</b> {}\n{status}\n↕️ <b>Change:</b> {previous} ➜ {current}\n🕒 <b>Time:</b> {}",
            self.header(title),
            escape_html(&item.brand),
            escape_html(&item.title),
            self.timestamp(now),
        )
    }

    fn summary_text(&self, summary: &Summary, now: DateTime<Utc>) -> String {
        let mut text = format!(
            "{}\n⏱ Auto-refresh every {}\n\n",
            self.header("Live stock summary"),
            cadence(self.refresh_every)
        );

        for (brand, blocks) in &summary.groups {
            let _ = writeln!(text, "🏪 <b>{}</b>", escape_html(brand));
            for block in blocks {
                match &block.outcome {
                    Err(error) => {
                        let _ = writeln!(text, "  • ❗<i>{}</i>", escape_html(error));
                    }
                    Ok(items) => {
                        for item in items {
                            let dot = if item.stock > 0 { "🟢" } else { "⚪" };
                            let _ = writeln!(
                                text,
                                "  {dot} <b>{}</b>: <code>{}</code>  <a href=\"{}\">buy</a>",
                                escape_html(&item.title),
                                item.stock,
                                escape_html(&block.url),
                            );
                        }
                    }
                }
            }
            text.push('\n');
        }

        let _ = write!(text, "🕒 <b>Updated:</b> {}", self.timestamp(now));
        text
    }
}

fn cadence(every: Duration) -> String {
    let secs = every.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{} min", secs / 60)
    } else {
        format!("{secs} s")
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use stockwatch_core::ParsedItem;

    use super::*;
    use crate::summary::{Summary, SummaryBlock};

    fn renderer() -> Renderer {
        Renderer::new("ZJMF Monitor", 8, Duration::from_secs(120))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 16, 30, 5).unwrap()
    }

    fn item() -> TrackedItem {
        TrackedItem::new("https://idc.example.com/cart?a=1&b=2", "HK <Mini>")
    }

    #[test]
    fn timestamp_uses_display_offset() {
        assert_eq!(renderer().timestamp(now()), "2026-03-02 00:30:05");
        let utc = Renderer::new("x", 0, Duration::from_secs(60));
        assert_eq!(utc.timestamp(now()), "2026-03-01 16:30:05");
    }

    #[test]
    fn invalid_offset_falls_back_to_utc() {
        let r = Renderer::new("x", 99, Duration::from_secs(60));
        assert_eq!(r.timestamp(now()), "2026-03-01 16:30:05");
    }

    #[test]
    fn restock_has_buy_and_summary_buttons() {
        let item = item();
        let msg = renderer().render(
            &Notice::Restock {
                item: &item,
                previous: 0,
                current: 3,
            },
            now(),
        );
        assert!(msg.text.contains("Stock change"));
        assert!(msg.text.contains("HK &lt;Mini&gt;"));
        assert!(msg.text.contains("<b>Vendor:</b> EXAMPLE"));
        assert!(msg.text.contains("0 ➜ 3"));
        assert!(msg.text.contains("2026-03-02 00:30:05"));
        assert_eq!(msg.notify, Some(true));
        assert_eq!(
            msg.buttons,
            vec![
                vec![InlineButton::url(
                    "🛒 Buy now",
                    "https://idc.example.com/cart?a=1&b=2"
                )],
                vec![InlineButton::callback("📊 View summary", ActionKind::SummaryNew)],
            ]
        );
    }

    #[test]
    fn sold_out_has_only_summary_button() {
        let item = item();
        let msg = renderer().render(
            &Notice::SoldOut {
                item: &item,
                previous: 4,
            },
            now(),
        );
        assert!(msg.text.contains("Sold out"));
        assert!(msg.text.contains("4 ➜ 0"));
        assert_eq!(
            msg.buttons,
            vec![vec![InlineButton::callback(
                "📊 View summary",
                ActionKind::SummaryNew
            )]]
        );
    }

    #[test]
    fn summary_lists_items_and_errors() {
        let mut summary = Summary::default();
        summary.groups.insert(
            "EXAMPLE".into(),
            vec![
                SummaryBlock {
                    url: "https://idc.example.com/a".into(),
                    outcome: Ok(vec![ParsedItem::new("HK", 2), ParsedItem::new("JP", 0)]),
                },
                SummaryBlock {
                    url: "https://idc.example.com/b".into(),
                    outcome: Err("HTTP 502".into()),
                },
            ],
        );
        let msg = renderer().render(&Notice::Summary(&summary), now());
        assert!(msg.text.contains("Live stock summary"));
        assert!(msg.text.contains("every 2 min"));
        assert!(msg.text.contains("🏪 <b>EXAMPLE</b>"));
        assert!(msg.text.contains("🟢 <b>HK</b>: <code>2</code>"));
        assert!(msg.text.contains("⚪ <b>JP</b>: <code>0</code>"));
        assert!(msg.text.contains("<a href=\"https://idc.example.com/a\">buy</a>"));
        assert!(msg.text.contains("❗<i>HTTP 502</i>"));
        assert!(msg.text.ends_with("🕒 <b>Updated:</b> 2026-03-02 00:30:05"));
        assert_eq!(
            msg.buttons,
            vec![vec![InlineButton::callback("🔄 Refresh", ActionKind::SummaryRefresh)]]
        );
        assert_eq!(msg.notify, None);
    }

    #[test]
    fn rendering_is_deterministic() {
        let summary = Summary::default();
        let a = renderer().render(&Notice::Summary(&summary), now());
        let b = renderer().render(&Notice::Summary(&summary), now());
        assert_eq!(a, b);
    }

    #[test]
    fn cadence_prefers_minutes() {
        assert_eq!(cadence(Duration::from_secs(120)), "2 min");
        assert_eq!(cadence(Duration::from_secs(90)), "90 s");
    }

    #[test]
    fn escape_covers_quotes() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
