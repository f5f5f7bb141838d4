//! Courier HTTP
//!
//! Typed request/response pipeline on top of reqwest.
//!
//! # Features
//!
//! - **Typed verbs**: GET/HEAD/POST/PUT/PATCH/DELETE decoding JSON, raw
//!   bytes, status or headers
//! - **Uploads**: JSON bodies with optional gzip compression for whitelisted
//!   URLs, raw binary bodies, `multipart/form-data`
//! - **Mocks**: canned responses keyed by URL, served without touching the
//!   network but interpreted exactly like real ones
//! - **Downloads**: streamed to a file with progress reporting
//! - **Busyness**: enter/leave notifications around every network operation
//! - **Favicons**: discover the icon a site advertises
//!
//! # Example
//!
//! ```ignore
//! use courier_core::{MimeType, Request, Status};
//! use courier_http::{Networking, NetworkingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let networking = Networking::new(&NetworkingConfig::load(None)?)?;
//!
//!     // Serve a canned response for one URL
//!     let url = "https://api.example.com/users/1".parse()?;
//!     networking.mocks().register(
//!         r#"{"id":1,"name":"John Doe"}"#,
//!         Status::OK,
//!         MimeType::ApplicationJson,
//!         url,
//!     );
//!
//!     let user: serde_json::Value = networking
//!         .get(Request::parse("https://api.example.com/users/1")?)
//!         .await?;
//!     println!("{}", user["name"]);
//!
//!     Ok(())
//! }
//! ```

mod busy;
mod client;
mod compression;
mod config;
mod download;
mod error;
mod favicon;
mod mock;
mod multipart;
mod response;
mod transport;
mod upload;

// Re-export main types
pub use client::Networking;
pub use config::{CompressionRuleConfig, NetworkingConfig};
pub use error::{Details, NetworkingError, Result};

// Request body preparation
pub use compression::{gzip, CompressionRules};
pub use multipart::{
    build_multipart_body, make_boundary, multipart_boundary, prepare_multipart_upload,
    BinaryAttachment, MultipartPart,
};
pub use upload::{prepare_binary_upload, prepare_upload};

// Response interpretation
pub use response::{
    decode, decode_bytes, handle_file, handle_response, AsBody, AsBytes, AsHeaders, AsJson, AsStatus,
    Interpretation,
};

// Transport, mocks and observers
pub use busy::{BusyGuard, BusynessObserver};
pub use download::{download_to_file, save_to_file, Progress};
pub use mock::{Mock, MockRegistry};
pub use transport::{ByteStream, ReqwestTransport, Transport};

pub use favicon::{
    construct_base_url, extract_attribute, parse_favicon_from_html, FaviconError, FaviconFetcher,
    FaviconInfo,
};
