//! The `Networking` facade: one entry point per HTTP verb.

use crate::busy::{BusyGuard, BusynessObserver};
use crate::compression::CompressionRules;
use crate::config::NetworkingConfig;
use crate::download::{download_to_file, save_to_file, Progress};
use crate::error::Result;
use crate::mock::MockRegistry;
use crate::multipart::{prepare_multipart_upload, BinaryAttachment, MultipartPart};
use crate::response::{AsBytes, AsHeaders, AsJson, AsStatus, Interpretation};
use crate::transport::{ReqwestTransport, Transport};
use crate::upload::{prepare_binary_upload, prepare_upload};
use bytes::Bytes;
use courier_core::{Headers, HttpResponse, Method, Request, Status};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Typed HTTP client over a [`Transport`].
///
/// Every call prepares its body, then checks the [`MockRegistry`]; only when
/// no mock matches does it mark the observer busy and hit the transport.
/// Mocked and real responses go through the same interpretation.
///
/// Cloning is cheap and clones share the mock and compression tables.
/// Dropping a returned future cancels the request.
///
/// # Example
///
/// ```ignore
/// use courier_http::{Networking, NetworkingConfig};
/// use courier_core::Request;
///
/// let networking = Networking::new(&NetworkingConfig::default())?;
/// networking.compression_rules().enable(r"https://api\.example\.com/.*", "api")?;
///
/// let user: User = networking
///     .get(Request::parse("https://api.example.com/users/1")?)
///     .await?;
///
/// let status = networking
///     .post_status(Request::parse("https://api.example.com/users")?, &user)
///     .await?;
/// ```
#[derive(Clone)]
pub struct Networking {
    transport: Arc<dyn Transport>,
    mocks: Arc<MockRegistry>,
    compression: Arc<CompressionRules>,
    busyness: Option<Arc<dyn BusynessObserver>>,
}

impl Networking {
    /// Create a reqwest-backed instance from `config`.
    pub fn new(config: &NetworkingConfig) -> Result<Self> {
        config.validate()?;
        let compression = config.compression_rules()?;
        let transport = ReqwestTransport::new(config)?;

        Ok(Self::with_transport(Arc::new(transport))
            .with_compression_rules(Arc::new(compression)))
    }

    /// Use `transport` with empty mock and compression tables.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            mocks: Arc::new(MockRegistry::new()),
            compression: Arc::new(CompressionRules::new()),
            busyness: None,
        }
    }

    #[must_use]
    pub fn with_mock_registry(mut self, mocks: Arc<MockRegistry>) -> Self {
        self.mocks = mocks;
        self
    }

    #[must_use]
    pub fn with_compression_rules(mut self, rules: Arc<CompressionRules>) -> Self {
        self.compression = rules;
        self
    }

    #[must_use]
    pub fn with_busyness_observer(mut self, observer: Arc<dyn BusynessObserver>) -> Self {
        self.busyness = Some(observer);
        self
    }

    pub fn mocks(&self) -> &Arc<MockRegistry> {
        &self.mocks
    }

    pub fn compression_rules(&self) -> &Arc<CompressionRules> {
        &self.compression
    }

    /// Send `request` as is and interpret the response with `I`.
    pub async fn send<I: Interpretation>(
        &self,
        request: Request,
        body: Option<Bytes>,
    ) -> Result<I::Output> {
        let (data, response) = self.exchange(&request, body).await?;
        I::interpret(data, &response)
    }

    async fn exchange(&self, request: &Request, body: Option<Bytes>) -> Result<(Bytes, HttpResponse)> {
        if let Some(mock) = self.mocks.lookup(request) {
            debug!(url = %mock_url(request), "Serving mocked response");
            return Ok((mock.data, mock.response));
        }

        let _busy = BusyGuard::new(self.busyness.clone());
        self.transport.send(request, body).await
    }

    // ------------------------------------------------------------------------
    // GET / HEAD
    // ------------------------------------------------------------------------

    /// GET and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        self.send::<AsJson<T>>(request.with_method(Method::Get), None)
            .await
    }

    /// GET raw bytes from a binary (or JSON byte array) response.
    pub async fn get_bytes(&self, request: Request) -> Result<Bytes> {
        self.send::<AsBytes>(request.with_method(Method::Get), None)
            .await
    }

    /// GET the body without looking at status or MIME type.
    pub async fn get_raw(&self, request: Request) -> Result<Bytes> {
        let (data, _) = self
            .exchange(&request.with_method(Method::Get), None)
            .await?;
        Ok(data)
    }

    /// Download into `destination`, returning the response headers.
    pub async fn get_to_file(&self, request: Request, destination: &Path) -> Result<Headers> {
        self.get_to_file_with_progress(request, destination, |_| {})
            .await
    }

    /// Download into `destination`, reporting progress as chunks arrive.
    ///
    /// `on_progress` is called on the task awaiting this future. Reported
    /// fractions never decrease and the last report is complete.
    pub async fn get_to_file_with_progress<F>(
        &self,
        request: Request,
        destination: &Path,
        on_progress: F,
    ) -> Result<Headers>
    where
        F: FnMut(Progress) + Send,
    {
        let request = request.with_method(Method::Get);

        if let Some(mock) = self.mocks.lookup(&request) {
            debug!(url = %mock_url(&request), "Serving mocked download");
            return save_to_file(&mock.response, &mock.data, destination, on_progress).await;
        }

        let _busy = BusyGuard::new(self.busyness.clone());
        let (response, stream) = self.transport.stream(&request).await?;
        download_to_file(&response, stream, destination, on_progress).await
    }

    /// HEAD, returning only the headers.
    pub async fn head(&self, request: Request) -> Result<Headers> {
        self.send::<AsHeaders>(request.with_method(Method::Head), None)
            .await
    }

    // ------------------------------------------------------------------------
    // POST
    // ------------------------------------------------------------------------

    /// POST `item` as JSON and decode the JSON response.
    pub async fn post<U, D>(&self, request: Request, item: &U) -> Result<D>
    where
        U: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        self.upload::<AsJson<D>, U>(request, Method::Post, item)
            .await
    }

    /// POST `item` as JSON, ignoring the response body.
    pub async fn post_status<U>(&self, request: Request, item: &U) -> Result<Status>
    where
        U: Serialize + ?Sized,
    {
        self.upload::<AsStatus, U>(request, Method::Post, item)
            .await
    }

    /// POST raw bytes as `application/octet-stream`. Never compressed.
    pub async fn post_data(&self, request: Request, data: impl Into<Bytes>) -> Result<Status> {
        let mut request = request.with_method(Method::Post);
        let body = prepare_binary_upload(data, &mut request);
        self.send::<AsStatus>(request, Some(body)).await
    }

    /// POST a multipart body, returning the status.
    pub async fn post_multipart(&self, request: Request, parts: &[MultipartPart]) -> Result<Status> {
        self.post_multipart_for::<AsStatus>(request, parts).await
    }

    /// POST a multipart body and interpret the response with `I`.
    pub async fn post_multipart_for<I: Interpretation>(
        &self,
        request: Request,
        parts: &[MultipartPart],
    ) -> Result<I::Output> {
        let mut request = request.with_method(Method::Post);
        let body = prepare_multipart_upload(parts, &mut request)?;
        self.send::<I>(request, Some(body)).await
    }

    /// POST `item` as a JSON part together with one binary part.
    pub async fn post_json_with_binary<U>(
        &self,
        request: Request,
        item: &U,
        binary: impl Into<Bytes>,
        attachment: &BinaryAttachment,
    ) -> Result<Status>
    where
        U: Serialize + ?Sized,
    {
        let parts = attachment.parts(item, binary)?;
        self.post_multipart(request, &parts).await
    }

    // ------------------------------------------------------------------------
    // PUT / PATCH / DELETE
    // ------------------------------------------------------------------------

    /// PUT `item` as JSON and decode the JSON response.
    pub async fn put<U, D>(&self, request: Request, item: &U) -> Result<D>
    where
        U: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        self.upload::<AsJson<D>, U>(request, Method::Put, item)
            .await
    }

    pub async fn put_status<U>(&self, request: Request, item: &U) -> Result<Status>
    where
        U: Serialize + ?Sized,
    {
        self.upload::<AsStatus, U>(request, Method::Put, item)
            .await
    }

    /// PATCH `item` as JSON and decode the JSON response.
    pub async fn patch<U, D>(&self, request: Request, item: &U) -> Result<D>
    where
        U: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        self.upload::<AsJson<D>, U>(request, Method::Patch, item)
            .await
    }

    pub async fn patch_status<U>(&self, request: Request, item: &U) -> Result<Status>
    where
        U: Serialize + ?Sized,
    {
        self.upload::<AsStatus, U>(request, Method::Patch, item)
            .await
    }

    /// DELETE, returning the status.
    pub async fn delete(&self, request: Request) -> Result<Status> {
        self.send::<AsStatus>(request.with_method(Method::Delete), None)
            .await
    }

    async fn upload<I, U>(&self, request: Request, method: Method, item: &U) -> Result<I::Output>
    where
        I: Interpretation,
        U: Serialize + ?Sized,
    {
        let mut request = request.with_method(method);
        let body = prepare_upload(&self.compression, item, &mut request)?;
        self.send::<I>(request, Some(body)).await
    }
}

impl std::fmt::Debug for Networking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Networking")
            .field("mocks", &self.mocks.len())
            .field("busyness", &self.busyness.is_some())
            .finish_non_exhaustive()
    }
}

fn mock_url(request: &Request) -> &str {
    request.url().map(Url::as_str).unwrap_or_default()
}
