// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ResponseParameters;

/// Errors surfaced by the bot client.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// A request parameter could not be serialized.
    #[error("encoding parameter `{field}`: {message}")]
    Encoding { field: String, message: String },

    /// The HTTP exchange failed or the response body could not be decoded.
    #[error("calling {method}: {source}")]
    Transport {
        method: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The remote API answered with `ok: false`.
    #[error("{method}: api error {code}: {description}")]
    Remote {
        method: String,
        code: i64,
        description: String,
        parameters: Option<ResponseParameters>,
    },

    #[error("invalid bot token")]
    InvalidToken,

    #[error("invalid api url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Another update source is already running on this bot.
    #[error("an update source is already active")]
    SourceActive,

    /// No webhook route was registered before starting the listener.
    #[error("no webhook registered")]
    WebhookNotConfigured,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub(crate) fn transport(
        method: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport { method: method.to_owned(), source: source.into() }
    }

    pub(crate) fn encoding(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Encoding { field: field.into(), message: message.to_string() }
    }

    /// Whether the polling worker should wait and retry after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Remote { .. })
    }

    /// Remote error code, when the failure came from the API itself.
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            Self::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Per-request failures of the webhook endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookError {
    NotFound,
    BadRequest,
    Unavailable,
}

impl WebhookError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::BadRequest => 400,
            Self::Unavailable => 503,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unavailable => "UNAVAILABLE",
        }
    }

    pub fn to_http_response(
        &self,
        message: impl Into<String>,
    ) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse { error: message.into() }))
    }
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error envelope returned by the webhook endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
