//! Favicon discovery for a host.

use crate::client::Networking;
use crate::error::NetworkingError;
use crate::response::AsBody;
use courier_core::{Method, Request};
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// `rel` values searched, in order of preference.
const LINK_PATTERNS: [&str; 4] = [
    r#"<link[^>]*rel\s*=\s*["']icon["'][^>]*>"#,
    r#"<link[^>]*rel\s*=\s*["']shortcut\s+icon["'][^>]*>"#,
    r#"<link[^>]*rel\s*=\s*["']apple-touch-icon["'][^>]*>"#,
    r#"<link[^>]*rel\s*=\s*["']apple-touch-icon-precomposed["'][^>]*>"#,
];

#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("Invalid host: {0}")]
    InvalidHost(String),

    #[error("HTML parsing failed: {0}")]
    HtmlParsingFailed(String),

    #[error(transparent)]
    Networking(#[from] NetworkingError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconInfo {
    pub url: Url,
    /// The link's `type` attribute, e.g. `image/png`
    pub mime_type: Option<String>,
    pub sizes: Option<String>,
}

impl FaviconInfo {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            mime_type: None,
            sizes: None,
        }
    }
}

/// Finds the icon a site advertises in its root page.
#[derive(Debug, Clone)]
pub struct FaviconFetcher {
    networking: Networking,
}

impl FaviconFetcher {
    pub fn new(networking: Networking) -> Self {
        Self { networking }
    }

    /// Fetch the root page of `host` and return its favicon, falling back
    /// to `/favicon.ico`.
    ///
    /// `host` may be a bare name, `name:port`, an IPv6 literal or a full URL.
    pub async fn find_favicon_url(&self, host: &str, port: u16) -> Result<FaviconInfo, FaviconError> {
        let base = construct_base_url(host, port)?;
        let root = join(&base, "/")?;

        debug!(url = %root, "Fetching root page for favicon");
        let data = self
            .networking
            .send::<AsBody>(Request::new(root).with_method(Method::Get), None)
            .await?;

        let html = std::str::from_utf8(&data).map_err(|_| {
            FaviconError::HtmlParsingFailed("Could not decode HTML as UTF-8".to_string())
        })?;

        if let Some(info) = parse_favicon_from_html(html, &base) {
            return Ok(info);
        }

        Ok(FaviconInfo::new(join(&base, "/favicon.ico")?))
    }
}

/// Normalize `host` and `port` into an origin URL.
///
/// For full URLs an explicit port wins, then a non-80 `port`, then the scheme
/// default. Bare hosts use `https` for 443, 8443 and 9443 and `http` for
/// everything else. Default ports are never spelled out.
pub fn construct_base_url(host: &str, port: u16) -> Result<Url, FaviconError> {
    let trimmed = host.trim();

    if let Ok(existing) = Url::parse(trimmed) {
        if let Some(existing_host) = existing.host_str() {
            let scheme = existing.scheme().to_ascii_lowercase();
            let default_port = match scheme.as_str() {
                "http" => Some(80),
                "https" => Some(443),
                _ => None,
            };
            let effective_port = existing
                .port()
                .or(if port != 80 { Some(port) } else { default_port });

            let mut url = Url::parse(&format!("{}://{}", scheme, existing_host))
                .map_err(|e| FaviconError::InvalidHost(format!("{}: {}", host, e)))?;
            if effective_port != default_port {
                set_port(&mut url, effective_port, host)?;
            }
            return Ok(url);
        }
    }

    let mut sanitized = trimmed.to_string();
    let mut host_port = None;

    if !sanitized.contains("://") && sanitized.contains(':') {
        if let Ok(placeholder) = Url::parse(&format!("placeholder://{}", sanitized)) {
            if let Some(derived) = placeholder.host_str().filter(|h| !h.is_empty()) {
                sanitized = derived.to_string();
                host_port = placeholder.port();
            }
        }
    }

    if sanitized.contains(':')
        && !sanitized.contains('[')
        && !sanitized.contains(']')
        && sanitized.chars().all(|c| c.is_ascii_hexdigit() || c == ':')
    {
        sanitized = format!("[{}]", sanitized);
    }

    let effective_port = host_port.unwrap_or(port);
    let scheme = match effective_port {
        443 | 8443 | 9443 => "https",
        _ => "http",
    };

    let mut url = Url::parse(&format!("{}://{}", scheme, sanitized))
        .map_err(|e| FaviconError::InvalidHost(format!("{}: {}", host, e)))?;
    if !url.host_str().is_some_and(|h| !h.is_empty()) {
        return Err(FaviconError::InvalidHost(host.to_string()));
    }

    let is_default = (effective_port == 80 && scheme == "http")
        || (effective_port == 443 && scheme == "https");
    if !is_default {
        set_port(&mut url, Some(effective_port), host)?;
    }

    Ok(url)
}

/// The first advertised icon in `html`, resolved against `base`.
pub fn parse_favicon_from_html(html: &str, base: &Url) -> Option<FaviconInfo> {
    LINK_PATTERNS
        .iter()
        .find_map(|pattern| extract_favicon_info(html, pattern, base))
}

/// Value of attribute `name` in a single tag. Case-insensitive.
pub fn extract_attribute(name: &str, tag: &str) -> Option<String> {
    let pattern = format!(r#"\b{}\s*=\s*["']([^"']*)["']"#, regex::escape(name));
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;

    regex
        .captures(tag)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_string())
}

fn extract_favicon_info(html: &str, pattern: &str, base: &Url) -> Option<FaviconInfo> {
    let regex: Regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .ok()?;

    let tag = regex.find(html)?.as_str();
    let href = extract_attribute("href", tag)?;
    let url = base.join(&href).ok()?;

    Some(FaviconInfo {
        url,
        mime_type: extract_attribute("type", tag),
        sizes: extract_attribute("sizes", tag),
    })
}

fn join(base: &Url, path: &str) -> Result<Url, FaviconError> {
    base.join(path)
        .map_err(|e| FaviconError::InvalidHost(format!("{}: {}", base, e)))
}

fn set_port(url: &mut Url, port: Option<u16>, host: &str) -> Result<(), FaviconError> {
    url.set_port(port)
        .map_err(|_| FaviconError::InvalidHost(format!("Cannot set port on {}", host)))
}
