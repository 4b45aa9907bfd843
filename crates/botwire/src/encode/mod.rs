// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request encoding: turns a parameter set into a body plus its content type.
//!
//! Parameter sets without uploads become a single JSON document; as soon as
//! one upload is present the whole request switches to `multipart/form-data`.

pub mod fields;
pub mod multipart;

use std::fmt;
use std::io;

use bytes::{Bytes, BytesMut};
use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use serde::Serialize;

use crate::error::BotError;
use crate::params::{ApiParams, Attachment, NamedFile};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Streaming request body chunks.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

pub enum RequestBody {
    Bytes(Bytes),
    Stream(BodyStream),
}

/// An encoded request, ready for the transport.
pub struct RequestData {
    pub content_type: String,
    pub body: RequestBody,
}

impl RequestData {
    pub fn is_json(&self) -> bool {
        self.content_type == CONTENT_TYPE_JSON
    }

    /// Drain the body into memory.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        match self.body {
            RequestBody::Bytes(bytes) => Ok(bytes),
            RequestBody::Stream(stream) => {
                let buf = stream
                    .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                        buf.extend_from_slice(&chunk);
                        Ok(buf)
                    })
                    .await?;
                Ok(buf.freeze())
            }
        }
    }

    pub(crate) fn into_http_body(self) -> (String, reqwest::Body) {
        let body = match self.body {
            RequestBody::Bytes(bytes) => reqwest::Body::from(bytes),
            RequestBody::Stream(stream) => reqwest::Body::wrap_stream(stream),
        };
        (self.content_type, body)
    }
}

impl fmt::Debug for RequestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.body {
            RequestBody::Bytes(bytes) => format!("{} bytes", bytes.len()),
            RequestBody::Stream(_) => "<stream>".to_owned(),
        };
        f.debug_struct("RequestData")
            .field("content_type", &self.content_type)
            .field("body", &body)
            .finish()
    }
}

/// Encode a parameter set, choosing JSON or multipart by whether any upload is present.
pub fn encode<P: ApiParams>(mut params: P) -> Result<RequestData, BotError> {
    let files: Vec<(String, NamedFile)> = params
        .attachments()
        .into_iter()
        .filter_map(|(field, attachment)| match attachment {
            Attachment::Present(file) => Some((field.to_owned(), file)),
            Attachment::Absent => None,
        })
        .collect();

    let fields = fields::collect(&params)?;
    if files.is_empty() {
        json_from_fields(&fields)
    } else {
        Ok(multipart::build(fields, files))
    }
}

/// Encode any serializable object as a newline-terminated JSON document.
pub fn json_request<T: Serialize + ?Sized>(params: &T) -> Result<RequestData, BotError> {
    json_from_fields(&fields::collect(params)?)
}

/// Encode scalar parameters plus uploads as `multipart/form-data`.
/// Absent uploads are dropped.
pub fn multipart_request<T: Serialize + ?Sized>(
    params: &T,
    files: Vec<(String, Attachment)>,
) -> Result<RequestData, BotError> {
    let fields = fields::collect(params)?;
    let files = files
        .into_iter()
        .filter_map(|(field, attachment)| match attachment {
            Attachment::Present(file) => Some((field, file)),
            Attachment::Absent => None,
        })
        .collect();
    Ok(multipart::build(fields, files))
}

fn json_from_fields(fields: &fields::Fields) -> Result<RequestData, BotError> {
    let body = fields::write_json(fields)?;
    Ok(RequestData { content_type: CONTENT_TYPE_JSON.to_owned(), body: RequestBody::Bytes(body.into()) })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
