//! Response classification and decoding.

use crate::error::{Details, NetworkingError, Result};
use bytes::Bytes;
use courier_core::{Headers, HttpResponse, MimeType, Status};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, warn};

/// Check that `response` is a well-formed 2xx response.
pub fn handle_response(response: &HttpResponse) -> Result<(Status, Headers)> {
    let status = checked_status(response)?;
    if !status.is_success() {
        return Err(NetworkingError::Unsuccessful(status));
    }
    Ok((status, response.headers().clone()))
}

/// Decode a JSON body into `T`.
///
/// Non-2xx responses declared as `application/json` whose body is a JSON
/// object fail with [`NetworkingError::UnsuccessfulWithDetails`]; any other
/// non-2xx response fails with [`NetworkingError::Unsuccessful`].
pub fn decode<T: DeserializeOwned>(data: &[u8], response: &HttpResponse) -> Result<T> {
    check_success(data, response)?;

    let mime = response.mime_type();
    if mime.is_json() {
        serde_json::from_slice(data).map_err(NetworkingError::Decoding)
    } else {
        Err(NetworkingError::UnexpectedMimeType(
            response.mime_type_string(),
        ))
    }
}

/// Raw body bytes.
///
/// Binary MIME types pass through untouched. A JSON body must be an array of
/// integers such as `[104, 105]`; a base64 string is a decoding error.
pub fn decode_bytes(data: Bytes, response: &HttpResponse) -> Result<Bytes> {
    check_success(&data, response)?;

    let mime = response.mime_type();
    if mime.is_binary() {
        Ok(data)
    } else if mime.is_json() {
        serde_json::from_slice::<Vec<u8>>(&data)
            .map(Bytes::from)
            .map_err(NetworkingError::Decoding)
    } else {
        Err(NetworkingError::UnexpectedMimeType(
            response.mime_type_string(),
        ))
    }
}

/// Move a downloaded file from `source` to `destination`, replacing whatever
/// is there.
pub async fn handle_file(
    source: &Path,
    destination: &Path,
    response: &HttpResponse,
) -> Result<Headers> {
    let (_, headers) = handle_response(response)?;

    match tokio::fs::remove_file(destination).await {
        Ok(()) => debug!(dest = %destination.display(), "Replaced existing file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(dest = %destination.display(), error = %e, "Could not remove existing file"),
    }
    tokio::fs::rename(source, destination).await?;

    Ok(headers)
}

fn checked_status(response: &HttpResponse) -> Result<Status> {
    if !response.is_well_formed() {
        return Err(NetworkingError::UnexpectedResponse(format!(
            "Invalid status code {}",
            response.status_code()
        )));
    }
    Ok(response.status())
}

/// Fail on non-2xx, attaching the parsed error body when there is one.
fn check_success(data: &[u8], response: &HttpResponse) -> Result<()> {
    let status = checked_status(response)?;
    if status.is_success() {
        return Ok(());
    }

    if response.mime_type() == MimeType::ApplicationJson {
        if let Ok(details) = serde_json::from_slice::<Details>(data) {
            return Err(NetworkingError::UnsuccessfulWithDetails { status, details });
        }
    }

    Err(NetworkingError::Unsuccessful(status))
}

/// How a response is turned into a value.
pub trait Interpretation {
    type Output;

    fn interpret(data: Bytes, response: &HttpResponse) -> Result<Self::Output>;
}

/// Decode the JSON body as `T`.
pub struct AsJson<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned> Interpretation for AsJson<T> {
    type Output = T;

    fn interpret(data: Bytes, response: &HttpResponse) -> Result<T> {
        decode(&data, response)
    }
}

/// Raw body bytes, see [`decode_bytes`].
///
/// JSON bodies are read as an array of byte values, not as base64.
pub struct AsBytes;

impl Interpretation for AsBytes {
    type Output = Bytes;

    fn interpret(data: Bytes, response: &HttpResponse) -> Result<Bytes> {
        decode_bytes(data, response)
    }
}

/// The body of a successful response, whatever its MIME type.
pub struct AsBody;

impl Interpretation for AsBody {
    type Output = Bytes;

    fn interpret(data: Bytes, response: &HttpResponse) -> Result<Bytes> {
        check_success(&data, response)?;
        Ok(data)
    }
}

/// Only the status; the body is ignored.
pub struct AsStatus;

impl Interpretation for AsStatus {
    type Output = Status;

    fn interpret(_data: Bytes, response: &HttpResponse) -> Result<Status> {
        handle_response(response).map(|(status, _)| status)
    }
}

/// Only the headers; the body is ignored.
pub struct AsHeaders;

impl Interpretation for AsHeaders {
    type Output = Headers;

    fn interpret(_data: Bytes, response: &HttpResponse) -> Result<Headers> {
        handle_response(response).map(|(_, headers)| headers)
    }
}
