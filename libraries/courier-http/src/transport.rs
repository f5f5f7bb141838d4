//! The HTTP transport seam and its reqwest implementation.

use crate::config::NetworkingConfig;
use crate::error::{NetworkingError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use courier_core::{HeaderField, Headers, HttpResponse, Request};
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// A response body delivered chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Performs the actual HTTP exchange.
///
/// Implementations only move bytes; status and MIME classification happen
/// above this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` with an optional body and collect the whole response.
    async fn send(&self, request: &Request, body: Option<Bytes>) -> Result<(Bytes, HttpResponse)>;

    /// Send a body-less `request` and hand back the response body as a stream.
    async fn stream(&self, request: &Request) -> Result<(HttpResponse, ByteStream)>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a client with the configured timeouts and user agent.
    pub fn new(config: &NetworkingConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http })
    }

    /// Wrap an already configured client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }

    fn build(&self, request: &Request, body: Option<Bytes>) -> Result<reqwest::RequestBuilder> {
        let url = target_url(request)?;
        let method = reqwest::Method::from_bytes(request.method().as_str().as_bytes())
            .map_err(|e| NetworkingError::UnsuitableRequest(e.to_string()))?;

        let mut builder = self.http.request(method, url.clone());

        for (name, value) in request.headers().iter() {
            // reqwest derives the length from the body itself
            if name.eq_ignore_ascii_case(HeaderField::ContentLength.as_str()) {
                continue;
            }
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                NetworkingError::UnsuitableRequest(format!("Invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                NetworkingError::UnsuitableRequest(format!("Invalid value for '{}': {}", name, e))
            })?;
            builder = builder.header(name, value);
        }

        if let Some(body) = body {
            builder = builder.body(body);
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &Request, body: Option<Bytes>) -> Result<(Bytes, HttpResponse)> {
        debug!(
            url = %display_url(request),
            method = request.method().as_str(),
            body_len = body.as_ref().map(Bytes::len).unwrap_or(0),
            "Sending request"
        );

        let response = self.build(request, body)?.send().await?;
        let head = response_head(&response);
        let data = response.bytes().await?;

        debug!(
            url = %display_url(request),
            status = head.status_code(),
            len = data.len(),
            "Received response"
        );

        Ok((data, head))
    }

    async fn stream(&self, request: &Request) -> Result<(HttpResponse, ByteStream)> {
        debug!(url = %display_url(request), "Opening response stream");

        let response = self.build(request, None)?.send().await?;
        let head = response_head(&response);
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(NetworkingError::from))
            .boxed();

        Ok((head, stream))
    }
}

fn target_url(request: &Request) -> Result<&Url> {
    let url = request
        .url()
        .ok_or_else(|| NetworkingError::UnsuitableRequest("Request has no URL".to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(NetworkingError::UnsuitableRequest(format!(
            "Unsupported URL scheme '{}'",
            scheme
        ))),
    }
}

fn display_url(request: &Request) -> &str {
    request.url().map(Url::as_str).unwrap_or("<none>")
}

fn response_head(response: &reqwest::Response) -> HttpResponse {
    let headers: Headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    HttpResponse::new(
        Some(response.url().clone()),
        response.status().as_u16(),
        headers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::Method;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&NetworkingConfig::default()).unwrap()
    }

    #[test]
    fn test_missing_url_is_unsuitable() {
        match transport().build(&Request::without_url(), None) {
            Err(NetworkingError::UnsuitableRequest(msg)) => assert!(msg.contains("no URL")),
            other => panic!("Expected UnsuitableRequest, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unsupported_scheme_is_unsuitable() {
        let request = Request::parse("ftp://files.example.com/a.bin").unwrap();
        match transport().build(&request, None) {
            Err(NetworkingError::UnsuitableRequest(msg)) => assert!(msg.contains("ftp")),
            other => panic!("Expected UnsuitableRequest, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_header_value_is_unsuitable() {
        let mut request = Request::parse("https://api.example.com/").unwrap();
        request.set_header("X-Broken", "line\nbreak");
        match transport().build(&request, None) {
            Err(NetworkingError::UnsuitableRequest(_)) => {}
            other => panic!("Expected UnsuitableRequest, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_carries_method_and_headers() {
        let mut request = Request::parse("https://api.example.com/items")
            .unwrap()
            .with_method(Method::Patch);
        request.set_header("Content-Type", "application/json");
        request.set_header("Content-Length", "2");

        let built = transport()
            .build(&request, Some(Bytes::from_static(b"{}")))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(built.method(), reqwest::Method::PATCH);
        assert_eq!(built.url().as_str(), "https://api.example.com/items");
        assert_eq!(
            built.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert!(built.headers().get("content-length").is_none());
    }
}
