// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed wrappers for the remote methods this crate ships with.
//!
//! Anything else goes through [`Bot::call`].

use crate::bot::Bot;
use crate::error::BotError;
use crate::params::{
    CopyMessageParams, DeleteWebhookParams, GetUpdatesParams, NoParams, SendDocumentParams,
    SendMessageParams, SetWebhookParams,
};
use crate::types::{Message, MessageId, Update, User};

impl Bot {
    /// `getMe`: the bot's own account.
    pub async fn get_me(&self) -> Result<User, BotError> {
        self.call("getMe", NoParams::default()).await
    }

    /// `getUpdates`: one fetch, without the polling worker.
    pub async fn get_updates(&self, params: GetUpdatesParams) -> Result<Vec<Update>, BotError> {
        self.call("getUpdates", params).await
    }

    pub async fn send_message(&self, params: SendMessageParams) -> Result<Message, BotError> {
        self.call("sendMessage", params).await
    }

    pub async fn copy_message(&self, params: CopyMessageParams) -> Result<MessageId, BotError> {
        self.call("copyMessage", params).await
    }

    /// `sendDocument`. Sent as multipart when the document or thumbnail is an upload.
    pub async fn send_document(&self, params: SendDocumentParams) -> Result<Message, BotError> {
        self.call("sendDocument", params).await
    }

    pub async fn set_webhook(&self, params: SetWebhookParams) -> Result<bool, BotError> {
        self.call("setWebhook", params).await
    }

    pub async fn delete_webhook(&self, params: DeleteWebhookParams) -> Result<bool, BotError> {
        self.call("deleteWebhook", params).await
    }
}
