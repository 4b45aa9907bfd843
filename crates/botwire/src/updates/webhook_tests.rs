// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::future::IntoFuture;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use super::*;
use crate::updates::UPDATE_CHANNEL_BUFFER;
use crate::error::ErrorResponse;
use crate::test_support::{update, AnyhowExt};

fn server(path: &str) -> anyhow::Result<(TestServer, UpdateStream, StopSignal)> {
    let stop = StopSignal::new();
    let (router, updates) = listen(path, stop.clone());
    Ok((TestServer::new(router).anyhow()?, updates, stop))
}

#[yare::parameterized(
    plain = { "/bot", "/bot" },
    relative = { "hook", "/hook" },
    braces = { "/a{b}", "/a{{b}}" },
)]
fn route_paths(input: &str, expected: &str) {
    assert_eq!(route_path(input), expected);
}

#[tokio::test]
async fn wrong_path_is_404() -> anyhow::Result<()> {
    let (server, _updates, _stop) = server("/bot")?;
    let resp = server.post("/elsewhere").json(&update(1)).await;
    resp.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn get_is_400_with_json_error() -> anyhow::Result<()> {
    let (server, _updates, _stop) = server("/bot")?;
    let resp = server.get("/bot").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.header("content-type"), "application/json");

    let body: ErrorResponse = resp.json();
    assert_eq!(body.error, "used invalid HTTP method: \"GET\", required method: \"POST\"");
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_400_naming_decode_failure() -> anyhow::Result<()> {
    let (server, _updates, _stop) = server("/bot")?;
    let resp = server.post("/bot").text("{not json").await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let body: ErrorResponse = resp.json();
    assert!(body.error.starts_with("decoding update: "), "{}", body.error);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_400_with_json_error() -> anyhow::Result<()> {
    let (server, _updates, _stop) = server("/bot")?;
    let text = "x".repeat(3 * 1024 * 1024);
    let payload = json!({"update_id": 1, "message": {"message_id": 1, "date": 0,
        "chat": {"id": 1, "type": "private"}, "text": text}});
    let resp = server.post("/bot").json(&payload).await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.header("content-type"), "application/json");

    let body: ErrorResponse = resp.json();
    assert!(body.error.starts_with("decoding update: "), "{}", body.error);
    Ok(())
}

#[tokio::test]
async fn missing_update_id_is_400() -> anyhow::Result<()> {
    let (server, _updates, _stop) = server("/bot")?;
    let resp = server.post("/bot").json(&json!({"message": null})).await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn valid_update_is_delivered_exactly_once() -> anyhow::Result<()> {
    let (server, mut updates, _stop) = server("/bot")?;
    let resp = server.post("/bot").json(&update(42)).await;
    resp.assert_status_ok();
    assert!(resp.text().is_empty());

    assert_eq!(updates.recv().await, Some(update(42)));
    let more = tokio::time::timeout(Duration::from_millis(50), updates.recv()).await;
    assert!(more.is_err(), "unexpected second update: {more:?}");
    Ok(())
}

#[tokio::test]
async fn updates_keep_arrival_order() -> anyhow::Result<()> {
    let (server, mut updates, _stop) = server("/bot")?;
    for id in [9, 3, 5] {
        server.post("/bot").json(&update(id)).await.assert_status_ok();
    }
    for id in [9, 3, 5] {
        assert_eq!(updates.recv().await.map(|u| u.update_id), Some(id));
    }
    Ok(())
}

#[tokio::test]
async fn full_channel_holds_the_response() -> anyhow::Result<()> {
    let (server, mut updates, _stop) = server("/bot")?;
    let capacity = UPDATE_CHANNEL_BUFFER as i64;
    for id in 0..capacity {
        server.post("/bot").json(&update(id)).await.assert_status_ok();
    }

    let pending = server.post("/bot").json(&update(capacity)).into_future();
    let mut pending = std::pin::pin!(pending);
    let early = tokio::time::timeout(Duration::from_millis(100), &mut pending).await;
    assert!(early.is_err(), "request completed while the channel was full");

    assert_eq!(updates.recv().await.map(|u| u.update_id), Some(0));
    pending.await.assert_status_ok();
    for id in 1..=capacity {
        assert_eq!(updates.recv().await.map(|u| u.update_id), Some(id));
    }
    Ok(())
}

#[tokio::test]
async fn stopped_source_is_503_and_stream_ends() -> anyhow::Result<()> {
    let (server, mut updates, stop) = server("/bot")?;
    stop.stop();

    let resp = server.post("/bot").json(&update(1)).await;
    resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(updates.recv().await, None);
    Ok(())
}
