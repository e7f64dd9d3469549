// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter tests against a local fake Bot API server.

use std::time::Duration;

use serde_json::{Value, json};
use stockwatch_config::TelegramConfig;
use stockwatch_core::{ChatId, InlineButton, MessageId, Notifier, OutboundMessage};
use stockwatch_telegram::{TelegramNotifier, run_callback_feed};
use teloxide::Bot;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOKEN: &str = "123456:TEST-TOKEN";

fn api_url(server: &MockServer) -> reqwest::Url {
    reqwest::Url::parse(&server.uri()).unwrap()
}

fn notifier(server: &MockServer) -> TelegramNotifier {
    TelegramNotifier::new(&TelegramConfig {
        bot_token: Some(TOKEN.to_string()),
        chat_ids: vec!["42".into()],
    })
    .unwrap()
    .with_api_url(api_url(server))
}

fn api_error(code: u16, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "ok": false,
        "error_code": code,
        "description": description,
    }))
}

async fn requests_to(server: &MockServer, method: &str) -> Vec<Request> {
    let suffix = format!("/{method}");
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path().ends_with(&suffix))
        .collect()
}

async fn wait_for_request(server: &MockServer, method: &str) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while requests_to(server, method).await.is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no {method} request within 5s"));
}

fn body_of(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

#[tokio::test]
async fn send_disables_link_previews() {
    let server = MockServer::start().await;
    Mock::given(path_regex(r"/sendMessage$"))
        .respond_with(api_error(400, "Bad Request: chat not found"))
        .mount(&server)
        .await;

    let message = OutboundMessage {
        text: "<b>Plan A</b> <a href=\"https://idc.example.com/cart\">buy</a>".into(),
        buttons: vec![vec![InlineButton::url("Buy now", "https://idc.example.com/cart")]],
        notify: Some(true),
    };
    assert!(notifier(&server).send(&ChatId::from("42"), &message).await.is_err());

    let sent = requests_to(&server, "sendMessage").await;
    assert_eq!(sent.len(), 1);
    let body = body_of(&sent[0]);
    assert_eq!(body["parse_mode"], "HTML");
    assert_eq!(body["link_preview_options"]["is_disabled"], true);
}

#[tokio::test]
async fn edit_disables_link_previews() {
    let server = MockServer::start().await;
    Mock::given(path_regex(r"/editMessageText$"))
        .respond_with(api_error(400, "Bad Request: message to edit not found"))
        .mount(&server)
        .await;

    let message = OutboundMessage {
        text: "summary".into(),
        ..OutboundMessage::default()
    };
    let result = notifier(&server)
        .edit(&ChatId::from("42"), &MessageId("7".into()), &message)
        .await;
    assert!(result.is_err());

    let edits = requests_to(&server, "editMessageText").await;
    assert_eq!(edits.len(), 1);
    assert_eq!(body_of(&edits[0])["link_preview_options"]["is_disabled"], true);
}

#[tokio::test]
async fn cancel_while_starting_stops_the_feed() {
    let server = MockServer::start().await;
    Mock::given(path_regex(r"/getMe$"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let bot = Bot::new(TOKEN).set_api_url(api_url(&server));
    let (tx, _rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let feed = tokio::spawn(run_callback_feed(bot, tx, cancel.clone()));

    wait_for_request(&server, "getMe").await;
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), feed)
        .await
        .expect("feed should stop soon after cancellation")
        .unwrap();
}

#[tokio::test]
async fn failed_start_is_retried_instead_of_panicking() {
    let server = MockServer::start().await;
    Mock::given(path_regex(r"/getMe$"))
        .respond_with(api_error(500, "Internal Server Error"))
        .mount(&server)
        .await;

    let bot = Bot::new(TOKEN).set_api_url(api_url(&server));
    let (tx, _rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let feed = tokio::spawn(run_callback_feed(bot, tx, cancel.clone()));

    // First attempt, then a second one after the initial backoff.
    tokio::time::timeout(Duration::from_secs(5), async {
        while requests_to(&server, "getMe").await.len() < 2 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("getMe should be retried");
    assert!(!feed.is_finished());

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), feed)
        .await
        .expect("feed should stop soon after cancellation")
        .unwrap();
}

#[tokio::test]
async fn unreachable_api_keeps_feed_alive_until_cancelled() {
    let bot = Bot::new(TOKEN).set_api_url(reqwest::Url::parse("http://127.0.0.1:9").unwrap());
    let (tx, _rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let feed = tokio::spawn(run_callback_feed(bot, tx, cancel.clone()));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!feed.is_finished());

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), feed)
        .await
        .expect("feed should stop soon after cancellation")
        .unwrap();
}
