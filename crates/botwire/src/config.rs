// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Connection and update-source settings for a bot.
#[derive(Debug, Clone, clap::Args)]
pub struct BotConfig {
    /// Bot token issued by the platform.
    #[arg(long, env = "BOTWIRE_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Base URL of the bot API server.
    #[arg(long, default_value = DEFAULT_API_URL, env = "BOTWIRE_API_URL")]
    pub api_url: String,

    /// HTTP request timeout in seconds. Must exceed the long-poll timeout.
    #[arg(long, default_value_t = 60, env = "BOTWIRE_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Delay between two `getUpdates` calls in milliseconds (0 = back to back).
    #[arg(long, default_value_t = 500, env = "BOTWIRE_POLL_INTERVAL_MS")]
    pub poll_interval_ms: u64,

    /// Host the webhook listener binds on.
    #[arg(long, default_value = "127.0.0.1", env = "BOTWIRE_WEBHOOK_HOST")]
    pub webhook_host: String,

    /// Port the webhook listener binds on.
    #[arg(long, default_value_t = 8443, env = "BOTWIRE_WEBHOOK_PORT")]
    pub webhook_port: u16,

    /// Path the webhook endpoint is served under.
    #[arg(long, default_value = "/bot", env = "BOTWIRE_WEBHOOK_PATH")]
    pub webhook_path: String,
}

impl BotConfig {
    /// Defaults for everything but the token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_owned(),
            request_timeout_secs: 60,
            poll_interval_ms: 500,
            webhook_host: "127.0.0.1".to_owned(),
            webhook_port: 8443,
            webhook_path: "/bot".to_owned(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn webhook_addr(&self) -> String {
        format!("{}:{}", self.webhook_host, self.webhook_port)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
