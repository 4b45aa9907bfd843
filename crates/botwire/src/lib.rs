// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Botwire: client core for an HTTP bot API.
//!
//! Encodes method parameters as JSON or multipart, invokes remote methods, and
//! turns long polling or an incoming webhook into one ordered [`UpdateStream`].

pub mod bot;
pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod methods;
pub mod params;
pub mod types;
pub mod updates;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::bot::Bot;
pub use crate::config::BotConfig;
pub use crate::error::BotError;
pub use crate::params::{Attachment, InputFile, NamedFile};
pub use crate::types::{ChatId, Update};
pub use crate::updates::polling::PollingOptions;
pub use crate::updates::{StopSignal, UpdateStream};
