// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook update source.
//!
//! The remote platform POSTs one JSON update per request to the registered
//! path. Each accepted update is pushed onto the bot's stream before the 200
//! response goes out, so a full channel slows the sender down. Request errors
//! fail only that exchange.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::sync::mpsc;

use super::{channel, deliver, StopSignal, UpdateStream};
use crate::error::WebhookError;
use crate::types::Update;

#[derive(Clone)]
struct WebhookState {
    tx: mpsc::Sender<Update>,
    stop: StopSignal,
}

/// Build the webhook router for `path` and the stream it feeds.
pub fn listen(path: &str, stop: StopSignal) -> (Router, UpdateStream) {
    let (tx, updates) = channel(stop.clone());
    (router(path, tx, stop), updates)
}

fn router(path: &str, tx: mpsc::Sender<Update>, stop: StopSignal) -> Router {
    Router::new()
        .route(&route_path(path), any(handle_update))
        .fallback(not_found)
        .with_state(WebhookState { tx, stop })
}

/// Absolute route for `path`, with braces escaped so they match literally.
fn route_path(path: &str) -> String {
    let path = path.replace('{', "{{").replace('}', "}}");
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

async fn handle_update(
    State(s): State<WebhookState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method != Method::POST {
        tracing::warn!(%method, "webhook request rejected");
        return WebhookError::BadRequest
            .to_http_response(format!(
                "used invalid HTTP method: {:?}, required method: \"POST\"",
                method.as_str()
            ))
            .into_response();
    }

    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(err = %e, "webhook payload rejected");
            return WebhookError::BadRequest
                .to_http_response(format!("decoding update: {e}"))
                .into_response();
        }
    };

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(err = %e, "webhook payload rejected");
            return WebhookError::BadRequest
                .to_http_response(format!("decoding update: {e}"))
                .into_response();
        }
    };

    let update_id = update.update_id;
    if !deliver(&s.tx, &s.stop, update).await {
        tracing::warn!(update_id, "webhook update dropped, source stopped");
        return WebhookError::Unavailable.to_http_response("webhook is stopped").into_response();
    }
    tracing::debug!(update_id, "webhook update received");
    StatusCode::OK.into_response()
}

async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::warn!(%method, path = uri.path(), "webhook request for unknown path");
    WebhookError::NotFound.to_http_response(format!("no webhook at {}", uri.path())).into_response()
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
