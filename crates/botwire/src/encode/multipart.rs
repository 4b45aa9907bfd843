// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `multipart/form-data` body assembly. File contents are streamed from their
//! readers rather than buffered.

use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use tokio_util::io::ReaderStream;

use super::fields::Fields;
use super::{BodyStream, RequestBody, RequestData};
use crate::params::NamedFile;

pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Build a multipart request: one file part per upload, then one form field
/// per scalar parameter. `Null` fields are omitted.
pub fn build(fields: Fields, files: Vec<(String, NamedFile)>) -> RequestData {
    let boundary = uuid::Uuid::new_v4().simple().to_string();
    let mut parts: Vec<BodyStream> = Vec::with_capacity(files.len() * 3 + 2);

    let uploaded: Vec<&str> = files.iter().map(|(f, _)| f.as_str()).collect();
    let mut text = String::new();
    for (key, value) in &fields {
        if uploaded.contains(&key.as_str()) {
            continue;
        }
        let Some(value) = form_value(value) else { continue };
        text.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{value}\r\n",
            escape_quotes(key)
        ));
    }
    text.push_str(&format!("--{boundary}--\r\n"));

    for (field, file) in files {
        tracing::trace!(field = %field, file = %file.name(), "encoding file part");
        let (name, reader) = file.into_parts();
        let header = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: {CONTENT_TYPE_OCTET_STREAM}\r\n\r\n",
            escape_quotes(&field),
            escape_quotes(&name)
        );
        parts.push(chunk(Bytes::from(header)));
        parts.push(ReaderStream::new(reader).boxed());
        parts.push(chunk(Bytes::from_static(b"\r\n")));
    }
    parts.push(chunk(Bytes::from(text)));

    RequestData {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body: RequestBody::Stream(stream::iter(parts).flatten().boxed()),
    }
}

fn chunk(bytes: Bytes) -> BodyStream {
    stream::iter([Ok(bytes)]).boxed()
}

/// Strings are sent raw; everything else as compact JSON text.
fn form_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
