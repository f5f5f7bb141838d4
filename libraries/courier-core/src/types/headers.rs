/// Header maps and typed header values
use crate::types::mime::{ContentEncoding, HeaderField, MimeType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{RangeFrom, RangeInclusive, RangeToInclusive};

/// Header name → value map.
///
/// Names keep the spelling they were inserted with, but lookups and
/// replacement ignore ASCII case. One value per name; the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct Headers(HashMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing entry with the same name.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let previous = self.remove(&name);
        self.0.insert(name, value.into());
        previous
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<String> {
        let name = name.as_ref();
        let key = self
            .0
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()?;
        self.0.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Headers> for HashMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Headers {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// A typed header: a well-known field together with a value rendered in its
/// wire syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    AcceptLanguage(String),
    /// Bearer token, rendered as `Bearer <token>`
    Authorization(String),
    /// Disposition components, joined with `"; "`
    ContentDisposition(Vec<String>),
    ContentEncoding(ContentEncoding),
    ContentLength(u64),
    ContentType(MimeType),
    /// `bytes=lo-hi`
    RangeClosed(RangeInclusive<u64>),
    /// `bytes=lo-`
    RangeFrom(RangeFrom<u64>),
    /// `bytes=-hi`
    RangeThrough(RangeToInclusive<u64>),
    UserAgent(String),
}

impl Header {
    pub fn field(&self) -> HeaderField {
        match self {
            Self::AcceptLanguage(_) => HeaderField::AcceptLanguage,
            Self::Authorization(_) => HeaderField::Authorization,
            Self::ContentDisposition(_) => HeaderField::ContentDisposition,
            Self::ContentEncoding(_) => HeaderField::ContentEncoding,
            Self::ContentLength(_) => HeaderField::ContentLength,
            Self::ContentType(_) => HeaderField::ContentType,
            Self::RangeClosed(_) | Self::RangeFrom(_) | Self::RangeThrough(_) => HeaderField::Range,
            Self::UserAgent(_) => HeaderField::UserAgent,
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::AcceptLanguage(value) | Self::UserAgent(value) => value.clone(),
            Self::Authorization(token) => format!("Bearer {}", token),
            Self::ContentDisposition(components) => components.join("; "),
            Self::ContentEncoding(encoding) => encoding.as_str().to_string(),
            Self::ContentLength(length) => length.to_string(),
            Self::ContentType(mime) => mime.as_str().to_string(),
            Self::RangeClosed(range) => format!("bytes={}-{}", range.start(), range.end()),
            Self::RangeFrom(range) => format!("bytes={}-", range.start),
            Self::RangeThrough(range) => format!("bytes=-{}", range.end),
        }
    }

    /// Write this header into `headers`, replacing any previous value.
    pub fn apply_to(&self, headers: &mut Headers) {
        headers.insert(self.field().as_str(), self.value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_case_insensitively() {
        let mut headers = Headers::new();
        headers.insert("content-type", "text/plain");
        let previous = headers.insert("Content-Type", "application/json");

        assert_eq!(previous.as_deref(), Some("text/plain"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(headers.iter().next(), Some(("Content-Type", "application/json")));
    }

    #[test]
    fn test_deserialize_keeps_one_entry_per_name() {
        let headers: Headers =
            serde_json::from_str(r#"{"content-type":"a","Content-Type":"b"}"#).unwrap();

        assert_eq!(headers.len(), 1);
        assert!(matches!(headers.get("CONTENT-TYPE"), Some("a") | Some("b")));

        let json = serde_json::to_string(&headers).unwrap();
        let again: Headers = serde_json::from_str(&json).unwrap();
        assert_eq!(again, headers);
    }

    #[test]
    fn test_remove_and_contains() {
        let mut headers: Headers = [("Range", "bytes=0-1")].into_iter().collect();
        assert!(headers.contains("range"));
        assert_eq!(headers.remove("RANGE").as_deref(), Some("bytes=0-1"));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("Range"), None);
    }

    #[test]
    fn test_range_forms() {
        assert_eq!(Header::RangeClosed(0..=499).value(), "bytes=0-499");
        assert_eq!(Header::RangeFrom(500..).value(), "bytes=500-");
        assert_eq!(Header::RangeThrough(..=250).value(), "bytes=-250");
        assert_eq!(Header::RangeFrom(9..).field(), HeaderField::Range);
    }

    #[test]
    fn test_header_values() {
        assert_eq!(Header::Authorization("abc".into()).value(), "Bearer abc");
        assert_eq!(
            Header::ContentDisposition(vec!["attachment".into(), "filename=\"a.txt\"".into()])
                .value(),
            "attachment; filename=\"a.txt\""
        );
        assert_eq!(Header::ContentEncoding(ContentEncoding::Gzip).value(), "gzip");
        assert_eq!(Header::ContentLength(42).value(), "42");
        assert_eq!(
            Header::ContentType(MimeType::ApplicationJson).value(),
            "application/json"
        );
    }

    #[test]
    fn test_apply_to_overwrites() {
        let mut headers = Headers::new();
        Header::UserAgent("first".into()).apply_to(&mut headers);
        Header::UserAgent("second".into()).apply_to(&mut headers);
        assert_eq!(headers.get("user-agent"), Some("second"));
        assert_eq!(headers.len(), 1);
    }
}
