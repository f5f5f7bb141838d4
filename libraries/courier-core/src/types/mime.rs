/// Closed value sets with canonical wire strings: MIME types, content
/// encodings, header field names and request methods.
use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME types the library knows by name.
///
/// Parsing never fails: anything unrecognized becomes [`MimeType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    ApplicationBinary,
    ApplicationJson,
    ApplicationOctetStream,
    ApplicationXDosexec,
    ImageJpeg,
    ImageHeic,
    MultipartFormData,
    TextPlain,
    TextJavascript,
    TextHtml,
    TextXml,
    Unknown,
}

impl MimeType {
    const ALL: [MimeType; 12] = [
        Self::ApplicationBinary,
        Self::ApplicationJson,
        Self::ApplicationOctetStream,
        Self::ApplicationXDosexec,
        Self::ImageJpeg,
        Self::ImageHeic,
        Self::MultipartFormData,
        Self::TextPlain,
        Self::TextJavascript,
        Self::TextHtml,
        Self::TextXml,
        Self::Unknown,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationBinary => "application/binary",
            Self::ApplicationJson => "application/json",
            Self::ApplicationOctetStream => "application/octet-stream",
            Self::ApplicationXDosexec => "application/x-dosexec",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageHeic => "image/heic",
            Self::MultipartFormData => "multipart/form-data",
            Self::TextPlain => "text/plain",
            Self::TextJavascript => "text/javascript",
            Self::TextHtml => "text/html",
            Self::TextXml => "text/xml",
            Self::Unknown => "unknown/unknown",
        }
    }

    /// Look up a bare MIME type (no parameters). Case-insensitive.
    pub fn from_wire(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|mime| mime.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(Self::Unknown)
    }

    /// Look up the MIME type of a full `Content-Type` value, ignoring any
    /// parameters such as `charset` or `boundary`.
    pub fn from_content_type(value: &str) -> Self {
        Self::from_wire(essence(value))
    }

    /// JSON-decodable payloads (`application/json`, `text/javascript`).
    pub fn is_json(&self) -> bool {
        matches!(self, Self::ApplicationJson | Self::TextJavascript)
    }

    /// Types some servers use for opaque binary payloads.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Self::ApplicationOctetStream | Self::ApplicationXDosexec | Self::ApplicationBinary
        )
    }
}

/// The `type/subtype` part of a `Content-Type` value, without parameters.
pub fn essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
}

impl From<&str> for MimeType {
    fn from(value: &str) -> Self {
        Self::from_content_type(value)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content codings for `Content-Encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    Gzip,
    Deflate,
    #[serde(rename = "br")]
    Brotli,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Brotli => "br",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gzip" => Some(Self::Gzip),
            "deflate" => Some(Self::Deflate),
            "br" => Some(Self::Brotli),
            _ => None,
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header field names the library sets or reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    AcceptLanguage,
    Authorization,
    ContentDisposition,
    ContentEncoding,
    ContentLength,
    ContentType,
    Range,
    UserAgent,
}

impl HeaderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AcceptLanguage => "Accept-Language",
            Self::Authorization => "Authorization",
            Self::ContentDisposition => "Content-Disposition",
            Self::ContentEncoding => "Content-Encoding",
            Self::ContentLength => "Content-Length",
            Self::ContentType => "Content-Type",
            Self::Range => "Range",
            Self::UserAgent => "User-Agent",
        }
    }
}

impl AsRef<str> for HeaderField {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Connect,
    Delete,
    #[default]
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_round_trip_through_wire_string() {
        for mime in MimeType::ALL {
            assert_eq!(MimeType::from_wire(mime.as_str()), mime);
        }
    }

    #[test]
    fn test_unrecognized_mime_is_unknown() {
        assert_eq!(
            MimeType::from_wire("application/vnd.example+json"),
            MimeType::Unknown
        );
        assert_eq!(MimeType::from_wire(""), MimeType::Unknown);
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        assert_eq!(
            MimeType::from_content_type("application/json; charset=utf-8"),
            MimeType::ApplicationJson
        );
        assert_eq!(
            MimeType::from_content_type("Multipart/Form-Data; boundary=abc"),
            MimeType::MultipartFormData
        );
        assert_eq!(essence("text/plain ; charset=ascii"), "text/plain");
    }

    #[test]
    fn test_mime_groups() {
        assert!(MimeType::TextJavascript.is_json());
        assert!(!MimeType::TextPlain.is_json());
        assert!(MimeType::ApplicationXDosexec.is_binary());
        assert!(!MimeType::ApplicationJson.is_binary());
    }

    #[test]
    fn test_encodings() {
        assert_eq!(ContentEncoding::Brotli.as_str(), "br");
        assert_eq!(ContentEncoding::from_wire("GZIP"), Some(ContentEncoding::Gzip));
        assert_eq!(ContentEncoding::from_wire("compress"), None);
    }

    #[test]
    fn test_header_fields_and_methods() {
        assert_eq!(HeaderField::ContentType.as_str(), "Content-Type");
        assert_eq!(HeaderField::AcceptLanguage.to_string(), "Accept-Language");
        assert_eq!(Method::default(), Method::Get);
        assert_eq!(Method::Patch.as_str(), "PATCH");
    }
}
