// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update sources and the stream they feed.
//!
//! Exactly one source (long polling or webhook) feeds a bot's stream at a
//! time. Each source owns the sending half of a bounded channel and watches a
//! [`StopSignal`]; the consumer holds the [`UpdateStream`].

pub mod polling;
pub mod webhook;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::types::Update;

/// Capacity of the channel between a source and its consumer.
pub const UPDATE_CHANNEL_BUFFER: usize = 100;

/// Stop request shared by a source, its stream and the owning bot.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    fired: Arc<AtomicBool>,
    token: CancellationToken,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Returns `true` only for the call that fired the signal;
    /// later calls are no-ops.
    pub fn stop(&self) -> bool {
        let first = !self.fired.swap(true, Ordering::AcqRel);
        self.token.cancel();
        first
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a stop has been requested.
    pub async fn stopped(&self) {
        self.token.cancelled().await;
    }

    /// Cancellation token that fires together with the signal.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Ordered, finite-until-stopped sequence of updates from the active source.
#[derive(Debug)]
pub struct UpdateStream {
    rx: mpsc::Receiver<Update>,
    stop: StopSignal,
}

impl UpdateStream {
    /// Next update, or `None` once the source stopped.
    ///
    /// A stop request ends the stream immediately, even with updates still
    /// buffered in the channel.
    pub async fn recv(&mut self) -> Option<Update> {
        if self.stop.is_stopped() {
            self.rx.close();
            return None;
        }
        tokio::select! {
            biased;
            _ = self.stop.stopped() => {}
            update = self.rx.recv() => return update,
        }
        self.rx.close();
        None
    }

    /// Signal that stops the source feeding this stream.
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn into_stream(self) -> impl Stream<Item = Update> + Send {
        stream::unfold(self, |mut updates| async move {
            let update = updates.recv().await?;
            Some((update, updates))
        })
    }
}

/// Build the channel a source feeds, bound to `stop`.
pub(crate) fn channel(stop: StopSignal) -> (mpsc::Sender<Update>, UpdateStream) {
    let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_BUFFER);
    (tx, UpdateStream { rx, stop })
}

/// Hand one update to the consumer, giving up if the source is stopped first.
///
/// Returns `false` when the update was not delivered: either a stop was
/// requested or the consumer dropped its stream.
pub(crate) async fn deliver(tx: &mpsc::Sender<Update>, stop: &StopSignal, update: Update) -> bool {
    tokio::select! {
        biased;
        _ = stop.stopped() => false,
        sent = tx.send(update) => sent.is_ok(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
