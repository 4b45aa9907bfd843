// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::BotError;
use crate::params::GetUpdatesParams;
use crate::types::{Chat, Message, Update};
use crate::updates::polling::UpdateFetcher;

pub const TOKEN: &str = "123456:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghi";

/// A text message update in chat 1.
pub fn update(id: i64) -> Update {
    Update {
        update_id: id,
        message: Some(Message {
            message_id: id,
            chat: Chat { id: 1, kind: "private".to_owned(), ..Default::default() },
            text: Some(format!("update {id}")),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn batch(ids: &[i64]) -> Result<Vec<Update>, BotError> {
    Ok(ids.iter().copied().map(update).collect())
}

pub fn failure() -> Result<Vec<Update>, BotError> {
    Err(BotError::transport("getUpdates", "connection refused"))
}

/// Scripted fetcher: pops one result per call, then returns empty batches.
#[derive(Default)]
pub struct MockFetcher {
    script: Mutex<VecDeque<Result<Vec<Update>, BotError>>>,
    calls: Mutex<Vec<(i64, Instant)>>,
    latency: Duration,
}

impl MockFetcher {
    pub fn new(script: impl IntoIterator<Item = Result<Vec<Update>, BotError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::default(),
            latency: Duration::ZERO,
        }
    }

    /// Make every fetch take `latency` before it resolves.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Offsets requested so far, in call order.
    pub fn offsets(&self) -> Vec<i64> {
        self.calls.lock().iter().map(|(offset, _)| *offset).collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().iter().map(|(_, at)| *at).collect()
    }
}

impl UpdateFetcher for MockFetcher {
    fn get_updates<'a>(
        &'a self,
        params: &'a GetUpdatesParams,
    ) -> BoxFuture<'a, Result<Vec<Update>, BotError>> {
        self.calls.lock().push((params.offset, Instant::now()));
        let next = self.script.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()));
        let latency = self.latency;
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            next
        })
    }
}

/// Convert any `Display` error into `anyhow::Error`.
pub trait AnyhowExt<T> {
    fn anyhow(self) -> anyhow::Result<T>;
}

impl<T, E: std::fmt::Display> AnyhowExt<T> for Result<T, E> {
    fn anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| anyhow::anyhow!("{e}"))
    }
}
