// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the remote bot API.
//!
//! Every call is a `POST <api_url>/bot<token>/<method>` whose response is the
//! `{ok, result, error_code, description}` envelope. No retries happen here.

use std::fmt;
use std::sync::{LazyLock, Once};
use std::time::Duration;

use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::encode::{encode, RequestData};
use crate::error::BotError;
use crate::params::ApiParams;
use crate::types::ApiResponse;

static TOKEN_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[0-9]+:[A-Za-z0-9_-]{35}$"));

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Whether `token` has the `<digits>:<35 url-safe chars>` shape.
pub fn validate_token(token: &str) -> bool {
    match &*TOKEN_RE {
        Ok(re) => re.is_match(token),
        Err(_) => false,
    }
}

/// Mask a secret for logging: first 7 + `***` + last 4 chars; short values
/// are fully masked.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_owned();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

/// HTTP client wrapper for one bot identity.
#[derive(Clone)]
pub struct ApiClient {
    api_url: String,
    token: String,
    client: Client,
}

impl ApiClient {
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, BotError> {
        if !validate_token(token) {
            return Err(BotError::InvalidToken);
        }
        let parsed = Url::parse(api_url).map_err(|e| BotError::InvalidUrl {
            url: api_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BotError::InvalidUrl {
                url: api_url.to_owned(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        ensure_crypto();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::transport("<client>", e))?;
        Ok(Self { api_url: api_url.trim_end_matches('/').to_owned(), token: token.to_owned(), client })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    /// Method URL with the token masked, safe to log.
    pub fn masked_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, mask_token(&self.token), method)
    }

    /// Send an encoded request and decode the response envelope.
    ///
    /// `ok: false` becomes [`BotError::Remote`] whatever the HTTP status;
    /// network failures and undecodable bodies become [`BotError::Transport`].
    pub async fn invoke(&self, method: &str, data: RequestData) -> Result<ApiResponse, BotError> {
        let (content_type, body) = data.into_http_body();
        tracing::debug!(url = %self.masked_url(method), content_type = %content_type, "api request");

        let resp = self
            .client
            .post(self.url(method))
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| BotError::transport(method, e.without_url()))?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| BotError::transport(method, e.without_url()))?;

        let envelope: ApiResponse = serde_json::from_slice(&bytes).map_err(|e| {
            BotError::transport(method, format!("decoding response (HTTP {status}): {e}"))
        })?;
        tracing::debug!(method, status = status.as_u16(), ok = envelope.ok, "api response");

        if !envelope.ok {
            return Err(BotError::Remote {
                method: method.to_owned(),
                code: envelope.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: envelope.description.unwrap_or_default(),
                parameters: envelope.parameters,
            });
        }
        Ok(envelope)
    }

    /// Encode `params`, invoke `method` and decode its `result`.
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R, BotError>
    where
        P: ApiParams,
        R: DeserializeOwned,
    {
        let data = encode(params)?;
        let envelope = self.invoke(method, data).await?;
        let result = envelope
            .result
            .ok_or_else(|| BotError::transport(method, "response has no result"))?;
        serde_json::from_value(result)
            .map_err(|e| BotError::transport(method, format!("decoding result: {e}")))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.api_url)
            .field("token", &mask_token(&self.token))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
