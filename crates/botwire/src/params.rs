// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed parameter sets for remote methods, and the file-upload types they carry.

use std::fmt;
use std::io;
use std::path::Path;

use bytes::Bytes;
use serde::{Serialize, Serializer};
use tokio::io::AsyncRead;

use crate::types::ChatId;

/// A parameter set that can be sent to a remote method.
///
/// Upload-capable parameter sets hand their files over through
/// [`ApiParams::attachments`]; those fields must be skipped by `Serialize`
/// whenever they hold an upload (see [`InputFile::is_upload`]).
pub trait ApiParams: Serialize {
    /// Take the uploads carried by this parameter set, keyed by wire field name.
    fn attachments(&mut self) -> Vec<(&'static str, Attachment)> {
        Vec::new()
    }
}

impl ApiParams for serde_json::Value {}

// -- Uploads ------------------------------------------------------------------

/// A byte stream paired with the file name it is uploaded under.
pub struct NamedFile {
    name: String,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl NamedFile {
    pub fn new(name: impl Into<String>, reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self { name: name.into(), reader: Box::new(reader) }
    }

    /// Upload an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(name, io::Cursor::new(data.into()))
    }

    /// Open a file on disk; the upload name is the path's final component.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
            .to_owned();
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(name, file))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_parts(self) -> (String, Box<dyn AsyncRead + Send + Unpin>) {
        (self.name, self.reader)
    }
}

impl fmt::Debug for NamedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFile").field("name", &self.name).finish_non_exhaustive()
    }
}

/// An optional upload bound to a form field. Absent attachments are never encoded.
#[derive(Debug, Default)]
pub enum Attachment {
    Present(NamedFile),
    #[default]
    Absent,
}

impl Attachment {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Move the upload out, leaving `Absent` behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl From<NamedFile> for Attachment {
    fn from(file: NamedFile) -> Self {
        Self::Present(file)
    }
}

impl From<Option<NamedFile>> for Attachment {
    fn from(file: Option<NamedFile>) -> Self {
        file.map_or(Self::Absent, Self::Present)
    }
}

/// A file parameter: either uploaded in the request body or referenced by
/// file id / URL.
#[derive(Debug)]
pub enum InputFile {
    Upload(Attachment),
    Remote(String),
}

impl InputFile {
    pub fn upload(file: NamedFile) -> Self {
        Self::Upload(Attachment::Present(file))
    }

    /// Reference an already uploaded file id or an HTTP URL.
    pub fn remote(id_or_url: impl Into<String>) -> Self {
        Self::Remote(id_or_url.into())
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }

    pub fn take_upload(&mut self) -> Attachment {
        match self {
            Self::Upload(attachment) => attachment.take(),
            Self::Remote(_) => Attachment::Absent,
        }
    }
}

impl Serialize for InputFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Remote(id) => serializer.serialize_str(id),
            Self::Upload(_) => {
                Err(serde::ser::Error::custom("file upload cannot be encoded as a plain value"))
            }
        }
    }
}

fn skip_file(file: &Option<InputFile>) -> bool {
    file.as_ref().is_none_or(InputFile::is_upload)
}

fn take_file(file: &mut Option<InputFile>) -> Attachment {
    file.as_mut().map_or(Attachment::Absent, InputFile::take_upload)
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

// -- Method parameters --------------------------------------------------------

/// `getUpdates`
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetUpdatesParams {
    #[serde(skip_serializing_if = "is_zero")]
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Long-poll timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
}

impl ApiParams for GetUpdatesParams {}

/// Parameters of methods that take none.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoParams {}

impl ApiParams for NoParams {}

/// `sendMessage`
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageParams {
    pub chat_id: ChatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

impl SendMessageParams {
    pub fn new(chat_id: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message_thread_id: None,
            text: text.into(),
            parse_mode: None,
            disable_notification: None,
            reply_to_message_id: None,
        }
    }
}

impl ApiParams for SendMessageParams {}

/// `copyMessage`
#[derive(Debug, Clone, Serialize)]
pub struct CopyMessageParams {
    pub chat_id: ChatId,
    pub from_chat_id: ChatId,
    pub message_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

impl CopyMessageParams {
    pub fn new(chat_id: impl Into<ChatId>, from_chat_id: impl Into<ChatId>, message_id: i64) -> Self {
        Self {
            chat_id: chat_id.into(),
            from_chat_id: from_chat_id.into(),
            message_id,
            caption: None,
            disable_notification: None,
        }
    }
}

impl ApiParams for CopyMessageParams {}

/// `sendDocument`
#[derive(Debug, Serialize)]
pub struct SendDocumentParams {
    pub chat_id: ChatId,
    #[serde(skip_serializing_if = "InputFile::is_upload")]
    pub document: InputFile,
    #[serde(skip_serializing_if = "skip_file")]
    pub thumbnail: Option<InputFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

impl SendDocumentParams {
    pub fn new(chat_id: impl Into<ChatId>, document: InputFile) -> Self {
        Self {
            chat_id: chat_id.into(),
            document,
            thumbnail: None,
            caption: None,
            parse_mode: None,
            disable_notification: None,
        }
    }
}

impl ApiParams for SendDocumentParams {
    fn attachments(&mut self) -> Vec<(&'static str, Attachment)> {
        vec![("document", self.document.take_upload()), ("thumbnail", take_file(&mut self.thumbnail))]
    }
}

/// `setWebhook`
#[derive(Debug, Default, Serialize)]
pub struct SetWebhookParams {
    pub url: String,
    /// Public key certificate for self-signed endpoints.
    #[serde(skip_serializing_if = "skip_file")]
    pub certificate: Option<InputFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_pending_updates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<String>,
}

impl ApiParams for SetWebhookParams {
    fn attachments(&mut self) -> Vec<(&'static str, Attachment)> {
        vec![("certificate", take_file(&mut self.certificate))]
    }
}

/// `deleteWebhook`
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteWebhookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_pending_updates: Option<bool>,
}

impl ApiParams for DeleteWebhookParams {}
