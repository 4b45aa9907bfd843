// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bot handle: API client plus the single active update source.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;

use crate::client::ApiClient;
use crate::config::BotConfig;
use crate::error::BotError;
use crate::params::{ApiParams, GetUpdatesParams};
use crate::updates::polling::{spawn_polling, PollingOptions};
use crate::updates::{webhook, StopSignal, UpdateStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    LongPolling,
    Webhook,
}

struct ActiveSource {
    kind: SourceKind,
    stop: StopSignal,
}

struct WebhookSlot {
    router: Router,
    stop: StopSignal,
}

struct BotInner {
    client: ApiClient,
    poll_interval: Duration,
    source: Mutex<Option<ActiveSource>>,
    webhook: Mutex<Option<WebhookSlot>>,
}

/// Handle to one bot identity. Clones share the client and the update source.
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

impl Bot {
    /// Bot against the default API server.
    pub fn new(token: &str) -> Result<Self, BotError> {
        Self::from_config(&BotConfig::with_token(token))
    }

    pub fn from_config(config: &BotConfig) -> Result<Self, BotError> {
        let client = ApiClient::new(&config.api_url, &config.token, config.request_timeout())?;
        Ok(Self {
            inner: Arc::new(BotInner {
                client,
                poll_interval: config.poll_interval(),
                source: Mutex::new(None),
                webhook: Mutex::new(None),
            }),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Invoke any remote method. No retries.
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R, BotError>
    where
        P: ApiParams,
        R: DeserializeOwned,
    {
        self.inner.client.call(method, params).await
    }

    // -- Update sources -------------------------------------------------------

    /// Start long polling with the configured poll interval.
    pub fn updates_via_long_polling(
        &self,
        params: Option<GetUpdatesParams>,
    ) -> Result<UpdateStream, BotError> {
        let options = PollingOptions { interval: self.inner.poll_interval };
        self.updates_via_long_polling_with(params.unwrap_or_default(), options)
    }

    pub fn updates_via_long_polling_with(
        &self,
        params: GetUpdatesParams,
        options: PollingOptions,
    ) -> Result<UpdateStream, BotError> {
        let stop = self.claim(SourceKind::LongPolling)?;
        Ok(spawn_polling(self.inner.client.clone(), params, options, stop))
    }

    /// Stop the long-polling source, if it is the active one.
    pub fn stop_long_polling(&self) {
        self.stop_source(SourceKind::LongPolling);
    }

    /// Register the webhook endpoint at `path` and return the stream it feeds.
    ///
    /// Serve it with [`Bot::start_listening_for_webhook`] or mount
    /// [`Bot::webhook_router`] into an existing server.
    pub fn updates_via_webhook(&self, path: &str) -> Result<UpdateStream, BotError> {
        let stop = self.claim(SourceKind::Webhook)?;
        let (router, updates) = webhook::listen(path, stop.clone());
        *self.inner.webhook.lock() = Some(WebhookSlot { router, stop });
        tracing::info!(path, "webhook registered");
        Ok(updates)
    }

    /// Router of the registered webhook, if any.
    pub fn webhook_router(&self) -> Option<Router> {
        self.inner.webhook.lock().as_ref().map(|slot| slot.router.clone())
    }

    /// Serve the registered webhook on `addr` until the webhook is stopped.
    ///
    /// Returns the bound address (useful with port 0). TLS is left to a
    /// fronting proxy.
    pub async fn start_listening_for_webhook(&self, addr: &str) -> Result<SocketAddr, BotError> {
        let (router, stop) = match self.inner.webhook.lock().as_ref() {
            Some(slot) if !slot.stop.is_stopped() => (slot.router.clone(), slot.stop.clone()),
            _ => return Err(BotError::WebhookNotConfigured),
        };

        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        tracing::info!(addr = %local, "webhook listening");

        let shutdown = stop.token();
        tokio::spawn(async move {
            let server =
                axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned());
            if let Err(e) = server.await {
                tracing::error!(err = %e, "webhook server failed");
            }
            tracing::info!(addr = %local, "webhook listener closed");
        });
        Ok(local)
    }

    /// Stop the webhook source, if it is the active one. Also shuts down a
    /// listener started with [`Bot::start_listening_for_webhook`].
    pub fn stop_webhook(&self) {
        if self.stop_source(SourceKind::Webhook) {
            *self.inner.webhook.lock() = None;
        }
    }

    /// Take the update-source slot. Fails while another source is running.
    fn claim(&self, kind: SourceKind) -> Result<StopSignal, BotError> {
        let mut source = self.inner.source.lock();
        if let Some(active) = source.as_ref() {
            if !active.stop.is_stopped() {
                tracing::warn!(
                    active = ?active.kind,
                    requested = ?kind,
                    "update source already active"
                );
                return Err(BotError::SourceActive);
            }
        }
        let stop = StopSignal::new();
        *source = Some(ActiveSource { kind, stop: stop.clone() });
        Ok(stop)
    }

    /// Fire the stop signal of the active source when it is of `kind`.
    /// Returns whether a source of that kind was found.
    fn stop_source(&self, kind: SourceKind) -> bool {
        let source = self.inner.source.lock();
        match source.as_ref() {
            Some(active) if active.kind == kind => {
                if active.stop.stop() {
                    tracing::info!(source = ?kind, "update source stopping");
                }
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot").field("client", &self.inner.client).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "bot_tests.rs"]
mod tests;
