//! Courier Core
//!
//! Transport-agnostic value types shared by the Courier HTTP layer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Status taxonomy**: `Status` with named constants and `ResponseType`
//!   classification by hundreds digit
//! - **Registry of wire names**: `MimeType`, `ContentEncoding`, `HeaderField`,
//!   `Method`, plus the typed `Header` (including the three `Range` forms)
//! - **Exchange values**: the caller-built `Request` and the transport-built
//!   `HttpResponse`
//!
//! # Example
//!
//! ```rust
//! use courier_core::types::{classify, Header, MimeType, Request, ResponseType, Status};
//!
//! let request = Request::parse("https://api.example.com/files/1")
//!     .unwrap()
//!     .with_header(Header::RangeClosed(0..=1023))
//!     .with_header(Header::ContentType(MimeType::ApplicationJson));
//! assert_eq!(request.header("range"), Some("bytes=0-1023"));
//!
//! assert_eq!(classify(404), ResponseType::ClientError);
//! assert!(Status::CREATED.is_success());
//! ```

#![forbid(unsafe_code)]

pub mod types;

pub use types::{
    classify, is_success, ContentEncoding, Header, HeaderField, Headers, HttpResponse, Method,
    MimeType, Request, ResponseType, Status,
};
