/// Outgoing request and incoming response values
use crate::types::headers::{Header, Headers};
use crate::types::mime::{essence, HeaderField, Method, MimeType};
use crate::types::status::Status;
use url::Url;

/// A caller-constructed request: URL, method and headers.
///
/// The body travels next to the request when it is handed to a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    url: Option<Url>,
    method: Method,
    headers: Headers,
}

impl Request {
    /// A GET request for `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url: Some(url),
            ..Self::default()
        }
    }

    /// Parse `url` and build a GET request for it.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self::new)
    }

    /// A request that has no URL yet.
    pub fn without_url() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn set_url(&mut self, url: Option<Url>) {
        self.url = url;
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value);
    }

    /// Apply a typed header.
    pub fn apply(&mut self, header: &Header) {
        header.apply_to(&mut self.headers);
    }

    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.apply(&header);
        self
    }
}

/// Status line and headers of a response as delivered by a transport.
///
/// The status is kept raw so a response with a malformed status line can be
/// told apart from a well-formed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    url: Option<Url>,
    status_code: u16,
    headers: Headers,
}

impl HttpResponse {
    pub fn new(url: Option<Url>, status_code: u16, headers: Headers) -> Self {
        Self {
            url,
            status_code,
            headers,
        }
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// True for three-digit status codes.
    pub fn is_well_formed(&self) -> bool {
        (100..=999).contains(&self.status_code)
    }

    pub fn status(&self) -> Status {
        Status::new(self.status_code)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn into_headers(self) -> Headers {
        self.headers
    }

    /// The declared MIME type, `unknown/unknown` when absent.
    pub fn mime_type_string(&self) -> String {
        self.headers
            .get(HeaderField::ContentType)
            .map(essence)
            .filter(|mime| !mime.is_empty())
            .unwrap_or(MimeType::Unknown.as_str())
            .to_ascii_lowercase()
    }

    pub fn mime_type(&self) -> MimeType {
        MimeType::from_wire(&self.mime_type_string())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(HeaderField::ContentLength)
            .and_then(|value| value.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_get() {
        let request = Request::parse("https://api.example.com/users").unwrap();
        assert_eq!(request.method(), Method::Get);
        assert_eq!(
            request.url().map(Url::as_str),
            Some("https://api.example.com/users")
        );
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_request_without_url() {
        let request = Request::without_url().with_method(Method::Delete);
        assert!(request.url().is_none());
        assert_eq!(request.method(), Method::Delete);
    }

    #[test]
    fn test_typed_headers_land_in_map() {
        let request = Request::parse("https://example.com")
            .unwrap()
            .with_header(Header::AcceptLanguage("de-DE".into()))
            .with_header(Header::RangeFrom(100..));
        assert_eq!(request.header("accept-language"), Some("de-DE"));
        assert_eq!(request.header("Range"), Some("bytes=100-"));
    }

    #[test]
    fn test_response_mime_type() {
        let headers: Headers = [("content-type", "Application/JSON; charset=utf-8")]
            .into_iter()
            .collect();
        let response = HttpResponse::new(None, 200, headers);
        assert_eq!(response.mime_type_string(), "application/json");
        assert_eq!(response.mime_type(), MimeType::ApplicationJson);

        let bare = HttpResponse::new(None, 200, Headers::new());
        assert_eq!(bare.mime_type_string(), "unknown/unknown");
        assert_eq!(bare.mime_type(), MimeType::Unknown);
    }

    #[test]
    fn test_response_well_formedness() {
        assert!(HttpResponse::new(None, 204, Headers::new()).is_well_formed());
        assert!(!HttpResponse::new(None, 42, Headers::new()).is_well_formed());
        assert_eq!(
            HttpResponse::new(None, 404, Headers::new()).status(),
            Status::NOT_FOUND
        );
    }

    #[test]
    fn test_content_length() {
        let headers: Headers = [("Content-Length", " 17 ")].into_iter().collect();
        assert_eq!(HttpResponse::new(None, 200, headers).content_length(), Some(17));
        assert_eq!(
            HttpResponse::new(None, 200, Headers::new()).content_length(),
            None
        );
    }
}
