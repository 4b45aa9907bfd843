// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook listener over real TCP.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;

use botwire::{Bot, BotConfig};

const TOKEN: &str = "123456:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghi";

async fn listening_bot(path: &str) -> anyhow::Result<(Bot, botwire::UpdateStream, String)> {
    botwire::client::ensure_crypto();
    let bot = Bot::from_config(&BotConfig::with_token(TOKEN))?;
    let updates = bot.updates_via_webhook(path)?;
    let addr = bot.start_listening_for_webhook("127.0.0.1:0").await?;
    Ok((bot, updates, format!("http://{addr}")))
}

#[tokio::test]
async fn posted_update_reaches_stream() -> anyhow::Result<()> {
    let (bot, mut updates, base) = listening_bot("/hook").await?;
    let http = reqwest::Client::new();

    let update = json!({
        "update_id": 77,
        "message": {"message_id": 5, "date": 0, "chat": {"id": 9, "type": "private"}, "text": "hi"}
    });
    let resp = http.post(format!("{base}/hook")).json(&update).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.bytes().await?.is_empty());

    let received = tokio::time::timeout(Duration::from_secs(5), updates.recv()).await?;
    let Some(received) = received else {
        anyhow::bail!("stream closed early");
    };
    assert_eq!(received.update_id, 77);
    assert_eq!(received.message.and_then(|m| m.text).as_deref(), Some("hi"));

    bot.stop_webhook();
    Ok(())
}

#[tokio::test]
async fn rejects_are_json_errors() -> anyhow::Result<()> {
    let (bot, _updates, base) = listening_bot("/hook").await?;
    let http = reqwest::Client::new();

    let resp = http.get(format!("{base}/hook")).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["error"], "used invalid HTTP method: \"GET\", required method: \"POST\"");

    let resp = http.post(format!("{base}/elsewhere")).body("{}").send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    bot.stop_webhook();
    Ok(())
}

#[tokio::test]
async fn stop_closes_stream_and_listener() -> anyhow::Result<()> {
    let (bot, mut updates, base) = listening_bot("/hook").await?;

    bot.stop_webhook();
    assert!(updates.recv().await.is_none());

    tokio::time::sleep(Duration::from_millis(100)).await;
    let http = reqwest::Client::new();
    let resp = http.post(format!("{base}/hook")).json(&json!({"update_id": 1})).send().await;
    if let Ok(resp) = resp {
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(())
}
