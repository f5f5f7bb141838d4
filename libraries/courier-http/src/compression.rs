//! Upload compression whitelist and gzip encoding.

use flate2::write::GzEncoder;
use flate2::Compression;
use regex::Regex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::RwLock;
use url::Url;

/// Keyed set of URL patterns whose JSON uploads may be gzip-compressed.
///
/// A URL is eligible iff at least one pattern matches the *whole* URL string.
/// Shared between concurrent requests; writers take a short exclusive lock.
#[derive(Debug, Default)]
pub struct CompressionRules {
    rules: RwLock<HashMap<String, Regex>>,
}

impl CompressionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the rule stored under `key`.
    pub fn enable(&self, pattern: &str, key: impl Into<String>) -> Result<(), regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        self.write().insert(key.into(), regex);
        Ok(())
    }

    /// Remove the rule stored under `key`, if any.
    pub fn disable(&self, key: &str) {
        self.write().remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether an upload to `url` should be compressed. No URL, no compression.
    pub fn matches(&self, url: Option<&Url>) -> bool {
        url.is_some_and(|url| self.matches_str(url.as_str()))
    }

    pub fn matches_str(&self, url: &str) -> bool {
        self.read().values().any(|regex| regex.is_match(url))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Regex>> {
        // A panicking writer cannot leave a half-inserted map behind.
        self.rules.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Regex>> {
        self.rules.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Gzip-compress `data` at the default level.
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
