// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-polling update source.
//!
//! One worker task repeatedly fetches updates newer than its offset and
//! forwards them in ascending id order. Fetch failures never end the worker:
//! it waits [`RETRY_DELAY`] and tries again. The stop signal is checked at the
//! top of each iteration only, so an in-flight fetch always completes.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::{channel, deliver, StopSignal, UpdateStream};
use crate::client::ApiClient;
use crate::error::BotError;
use crate::params::GetUpdatesParams;
use crate::types::Update;

/// Fixed wait after a failed fetch.
pub const RETRY_DELAY: Duration = Duration::from_secs(3);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Source of `getUpdates` batches.
pub trait UpdateFetcher: Send + Sync + 'static {
    fn get_updates<'a>(
        &'a self,
        params: &'a GetUpdatesParams,
    ) -> BoxFuture<'a, Result<Vec<Update>, BotError>>;
}

impl UpdateFetcher for ApiClient {
    fn get_updates<'a>(
        &'a self,
        params: &'a GetUpdatesParams,
    ) -> BoxFuture<'a, Result<Vec<Update>, BotError>> {
        Box::pin(self.call("getUpdates", params.clone()))
    }
}

impl<T: UpdateFetcher> UpdateFetcher for Arc<T> {
    fn get_updates<'a>(
        &'a self,
        params: &'a GetUpdatesParams,
    ) -> BoxFuture<'a, Result<Vec<Update>, BotError>> {
        (**self).get_updates(params)
    }
}

/// Tuning for the polling worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingOptions {
    /// Sleep between two successful fetches. Zero polls back to back.
    pub interval: Duration,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL }
    }
}

/// Next update id to request.
///
/// The offset moves past an update before that update is handed to the
/// consumer, so an update is never requested again once it was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTracker {
    next: i64,
}

impl OffsetTracker {
    pub fn new(offset: i64) -> Self {
        Self { next: offset }
    }

    pub fn next(&self) -> i64 {
        self.next
    }

    /// Advance past `update` if it is new. Returns whether it should be delivered.
    pub fn admit(&mut self, update: &Update) -> bool {
        if update.update_id < self.next {
            return false;
        }
        self.next = update.update_id.saturating_add(1);
        true
    }
}

/// Spawn the polling worker and return the stream it feeds.
///
/// `params.offset` seeds the offset; the worker overwrites it on every fetch.
pub fn spawn_polling<F: UpdateFetcher>(
    fetcher: F,
    params: GetUpdatesParams,
    options: PollingOptions,
    stop: StopSignal,
) -> UpdateStream {
    let (tx, updates) = channel(stop.clone());
    tokio::spawn(async move {
        let mut params = params;
        let mut offsets = OffsetTracker::new(params.offset);
        tracing::info!(
            offset = offsets.next(),
            interval = ?options.interval,
            "long polling started"
        );

        'poll: loop {
            if stop.is_stopped() {
                break;
            }

            params.offset = offsets.next();
            let mut batch = match fetcher.get_updates(&params).await {
                Ok(batch) => batch,
                Err(e) => {
                    let retry_in_secs = RETRY_DELAY.as_secs();
                    if e.is_retryable() {
                        tracing::warn!(err = %e, retry_in_secs, "fetching updates failed");
                    } else {
                        tracing::error!(err = %e, retry_in_secs, "fetching updates failed");
                    }
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            batch.sort_by_key(|u| u.update_id);
            for update in batch {
                if !offsets.admit(&update) {
                    tracing::debug!(update_id = update.update_id, "skipping stale update");
                    continue;
                }
                tracing::debug!(
                    update_id = update.update_id,
                    kind = update.kind(),
                    "update received"
                );
                if !deliver(&tx, &stop, update).await {
                    stop.stop();
                    break 'poll;
                }
            }

            if options.interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(options.interval).await;
            }
        }

        tracing::info!(offset = offsets.next(), "long polling stopped");
    });
    updates
}

#[cfg(test)]
#[path = "polling_tests.rs"]
mod tests;
