//! `multipart/form-data` body construction.

use crate::error::{NetworkingError, Result};
use bytes::{BufMut, Bytes, BytesMut};
use courier_core::{Header, HeaderField, MimeType, Request};
use serde::Serialize;

/// One named part of a multipart body. Parts are written in the order given;
/// names may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub data: Bytes,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
}

impl MultipartPart {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            filename: None,
            mime_type: None,
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_mime(mut self, mime: MimeType) -> Self {
        self.mime_type = Some(mime.as_str().to_string());
        self
    }

    /// A free-form MIME type string, for types outside [`MimeType`].
    #[must_use]
    pub fn with_mime_str(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// JSON-encode `value` into an `application/json` part.
    pub fn json<T>(value: &T, name: impl Into<String>, filename: Option<String>) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(value).map_err(|e| {
            NetworkingError::UnsuitableRequest(format!("Failed to encode JSON part: {}", e))
        })?;

        Ok(Self {
            name: name.into(),
            data: Bytes::from(data),
            filename,
            mime_type: Some(MimeType::ApplicationJson.as_str().to_string()),
        })
    }
}

/// Field names and file metadata for a JSON document uploaded together with
/// one binary attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAttachment {
    pub json_field: String,
    pub binary_field: String,
    pub filename: String,
    pub mime: MimeType,
}

impl Default for BinaryAttachment {
    fn default() -> Self {
        Self {
            json_field: "json".to_string(),
            binary_field: "file".to_string(),
            filename: "file.bin".to_string(),
            mime: MimeType::ApplicationOctetStream,
        }
    }
}

impl BinaryAttachment {
    /// The JSON part followed by the binary part.
    pub fn parts<T>(&self, item: &T, binary: impl Into<Bytes>) -> Result<Vec<MultipartPart>>
    where
        T: Serialize + ?Sized,
    {
        Ok(vec![
            MultipartPart::json(item, self.json_field.clone(), None)?,
            MultipartPart::new(self.binary_field.clone(), binary)
                .with_filename(self.filename.clone())
                .with_mime(self.mime),
        ])
    }
}

/// Build a multipart body from `parts` and set the request's `Content-Type`.
///
/// A boundary already present in the request's `Content-Type` is reused,
/// otherwise a fresh one is generated.
pub fn prepare_multipart_upload(parts: &[MultipartPart], request: &mut Request) -> Result<Bytes> {
    if parts.is_empty() {
        return Err(NetworkingError::UnsuitableRequest(
            "Multipart upload requires at least one part".to_string(),
        ));
    }

    let boundary = request
        .header(HeaderField::ContentType)
        .and_then(multipart_boundary)
        .unwrap_or_else(make_boundary);

    request.set_header(
        HeaderField::ContentType.as_str(),
        format!("{}; boundary={}", MimeType::MultipartFormData, boundary),
    );
    request.headers_mut().remove(HeaderField::ContentEncoding);

    let body = build_multipart_body(parts, &boundary);
    request.apply(&Header::ContentLength(body.len() as u64));
    Ok(body)
}

/// Serialize `parts` with CRLF line breaks and a closing `--boundary--` line.
pub fn build_multipart_body(parts: &[MultipartPart], boundary: &str) -> Bytes {
    let capacity = parts
        .iter()
        .map(|part| part.data.len() + boundary.len() + 128)
        .sum::<usize>()
        + boundary.len()
        + 8;
    let mut body = BytesMut::with_capacity(capacity);

    for part in parts {
        body.put_slice(format!("--{}\r\n", boundary).as_bytes());

        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = &part.filename {
            disposition.push_str(&format!("; filename=\"{}\"", filename));
        }
        body.put_slice(disposition.as_bytes());
        body.put_slice(b"\r\n");

        if let Some(mime) = &part.mime_type {
            body.put_slice(format!("Content-Type: {}\r\n", mime).as_bytes());
        }

        body.put_slice(b"\r\n");
        body.put_slice(&part.data);
        body.put_slice(b"\r\n");
    }

    body.put_slice(format!("--{}--\r\n", boundary).as_bytes());
    body.freeze()
}

/// The `boundary` parameter of a `Content-Type` value, unquoted.
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .map(str::trim)
        .find_map(|param| {
            let (name, value) = param.split_once('=')?;
            if !name.trim().eq_ignore_ascii_case("boundary") {
                return None;
            }
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then(|| value.to_string())
        })
}

/// A UUID-derived boundary token.
pub fn make_boundary() -> String {
    format!(
        "Boundary-{}",
        uuid::Uuid::new_v4().to_string().to_ascii_uppercase()
    )
}
