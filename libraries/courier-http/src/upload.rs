//! Outgoing body preparation for JSON and raw binary uploads.

use crate::compression::{gzip, CompressionRules};
use crate::error::{NetworkingError, Result};
use bytes::Bytes;
use courier_core::{ContentEncoding, Header, HeaderField, MimeType, Request};
use serde::Serialize;
use tracing::debug;

/// Encode `item` as JSON and set the matching headers on `request`.
///
/// When the request URL is whitelisted in `rules` the body is gzip-compressed,
/// but only if that makes it strictly smaller. Compression failures fall back
/// to the plain body.
pub fn prepare_upload<T>(rules: &CompressionRules, item: &T, request: &mut Request) -> Result<Bytes>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec(item).map_err(|e| {
        NetworkingError::UnsuitableRequest(format!("Failed to encode JSON body: {}", e))
    })?;

    request.apply(&Header::ContentType(MimeType::ApplicationJson));
    request.headers_mut().remove(HeaderField::ContentEncoding);

    let body = if rules.matches(request.url()) {
        match gzip(&json) {
            Ok(compressed) if compressed.len() < json.len() => {
                debug!(
                    original = json.len(),
                    compressed = compressed.len(),
                    "Compressed upload body"
                );
                request.apply(&Header::ContentEncoding(ContentEncoding::Gzip));
                compressed
            }
            Ok(compressed) => {
                debug!(
                    original = json.len(),
                    compressed = compressed.len(),
                    "Compression did not shrink body, sending uncompressed"
                );
                json
            }
            Err(e) => {
                debug!(error = %e, "Compression failed, sending uncompressed");
                json
            }
        }
    } else {
        json
    };

    request.apply(&Header::ContentLength(body.len() as u64));
    Ok(Bytes::from(body))
}

/// Use `data` verbatim as an `application/octet-stream` body.
pub fn prepare_binary_upload(data: impl Into<Bytes>, request: &mut Request) -> Bytes {
    let data = data.into();
    request.apply(&Header::ContentType(MimeType::ApplicationOctetStream));
    request.headers_mut().remove(HeaderField::ContentEncoding);
    request.apply(&Header::ContentLength(data.len() as u64));
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use serde::Serialize;
    use std::io::Read;

    #[derive(Serialize)]
    struct Payload {
        message: String,
    }

    fn repetitive() -> Payload {
        Payload {
            message: "courier ".repeat(200),
        }
    }

    #[test]
    fn test_plain_upload_sets_json_headers() {
        let rules = CompressionRules::new();
        let mut request = Request::parse("https://api.example.com/users").unwrap();

        let body = prepare_upload(&rules, &serde_json::json!({"id": 1}), &mut request).unwrap();

        assert_eq!(body.as_ref(), br#"{"id":1}"#);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("Content-Length"), Some("8"));
        assert!(request.header("Content-Encoding").is_none());
    }

    #[test]
    fn test_whitelisted_upload_is_compressed() {
        let rules = CompressionRules::new();
        rules.enable(r"https://api\.example\.com/.*", "api").unwrap();
        let mut request = Request::parse("https://api.example.com/users").unwrap();

        let item = repetitive();
        let body = prepare_upload(&rules, &item, &mut request).unwrap();

        assert_eq!(request.header("Content-Encoding"), Some("gzip"));
        assert_eq!(
            request.header("Content-Length"),
            Some(body.len().to_string().as_str())
        );

        let mut decoded = Vec::new();
        GzDecoder::new(body.as_ref()).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, serde_json::to_vec(&item).unwrap());
    }

    #[test]
    fn test_tiny_body_stays_uncompressed() {
        let rules = CompressionRules::new();
        rules.enable(".*", "all").unwrap();
        let mut request = Request::parse("https://api.example.com/users").unwrap();

        // gzip framing alone is larger than this
        let body = prepare_upload(&rules, &1u8, &mut request).unwrap();

        assert_eq!(body.as_ref(), b"1");
        assert!(request.header("Content-Encoding").is_none());
    }

    #[test]
    fn test_urlless_request_is_never_compressed() {
        let rules = CompressionRules::new();
        rules.enable(".*", "all").unwrap();
        let mut request = Request::without_url();

        let item = repetitive();
        let body = prepare_upload(&rules, &item, &mut request).unwrap();

        assert_eq!(body.as_ref(), serde_json::to_vec(&item).unwrap().as_slice());
        assert!(request.header("Content-Encoding").is_none());
    }

    #[test]
    fn test_unencodable_item_is_unsuitable() {
        use std::collections::HashMap;

        // JSON object keys must be strings
        let item: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let mut request = Request::parse("https://api.example.com/").unwrap();

        match prepare_upload(&CompressionRules::new(), &item, &mut request) {
            Err(NetworkingError::UnsuitableRequest(_)) => {}
            other => panic!("Expected UnsuitableRequest, got: {:?}", other),
        }
    }

    #[test]
    fn test_binary_upload_headers() {
        let mut request = Request::parse("https://api.example.com/blob").unwrap();
        request.set_header("content-encoding", "gzip");

        let body = prepare_binary_upload(vec![0u8, 1, 2, 3], &mut request);

        assert_eq!(body.as_ref(), &[0, 1, 2, 3]);
        assert_eq!(request.header("Content-Type"), Some("application/octet-stream"));
        assert_eq!(request.header("Content-Length"), Some("4"));
        assert!(request.header("Content-Encoding").is_none());
    }
}
