//! Canned responses keyed by exact URL.

use bytes::Bytes;
use courier_core::{Header, Headers, HttpResponse, MimeType, Request, Status};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use url::Url;

/// A canned body and synthetic response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mock {
    pub data: Bytes,
    pub response: HttpResponse,
}

/// URL → [`Mock`] table consulted before any transport call.
///
/// Matching is on the exact URL string: no patterns, no query normalization.
/// Entries live until unregistered; registering a URL again replaces it.
#[derive(Debug, Default)]
pub struct MockRegistry {
    mocks: RwLock<HashMap<Url, Mock>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` with `status` and `mime` for requests to `url`.
    pub fn register(&self, data: impl Into<Bytes>, status: Status, mime: MimeType, url: Url) {
        let data = data.into();

        let mut headers = Headers::new();
        Header::ContentType(mime).apply_to(&mut headers);
        Header::ContentLength(data.len() as u64).apply_to(&mut headers);

        let response = HttpResponse::new(Some(url.clone()), status.code(), headers);
        self.write().insert(url, Mock { data, response });
    }

    /// The mock registered for the request's URL, if any.
    pub fn lookup(&self, request: &Request) -> Option<Mock> {
        let url = request.url()?;
        self.read().get(url).cloned()
    }

    pub fn unregister(&self, url: &Url) -> Option<Mock> {
        self.write().remove(url)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Url, Mock>> {
        self.mocks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Url, Mock>> {
        self.mocks.write().unwrap_or_else(|e| e.into_inner())
    }
}
