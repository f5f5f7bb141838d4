//! Error types for Courier networking.

use courier_core::Status;
use std::collections::HashMap;
use thiserror::Error;

/// A JSON object parsed from an unsuccessful response body.
pub type Details = HashMap<String, serde_json::Value>;

/// Errors that can occur while preparing, sending or interpreting a request.
///
/// Every failure carries exactly one cause.
#[derive(Error, Debug)]
pub enum NetworkingError {
    /// The outgoing request cannot be sent as built
    #[error("Unsuitable request: {0}")]
    UnsuitableRequest(String),

    /// The transport delivered something that is not a usable HTTP response
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The response MIME type does not fit the requested decode target
    #[error("Unexpected MIME type: {0}")]
    UnexpectedMimeType(String),

    /// Non-2xx status without a usable error body
    #[error("Unsuccessful: {0}")]
    Unsuccessful(Status),

    /// A JSON body could not be decoded into the requested type
    #[error("Decoding failed: {0}")]
    Decoding(#[source] serde_json::Error),

    /// Non-2xx status with a JSON object describing the failure
    #[error("Unsuccessful: {status} ({} detail fields)", .details.len())]
    UnsuccessfulWithDetails { status: Status, details: Details },

    /// The HTTP client failed (connect, TLS, body stream)
    #[error("Transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// IO error while staging or moving a downloaded file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NetworkingError {
    /// The status of an unsuccessful response, if this error carries one.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Unsuccessful(status) | Self::UnsuccessfulWithDetails { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// The parsed error body, if the server supplied one.
    pub fn details(&self) -> Option<&Details> {
        match self {
            Self::UnsuccessfulWithDetails { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// Result type for networking operations.
pub type Result<T> = std::result::Result<T, NetworkingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        assert_eq!(
            NetworkingError::Unsuccessful(Status::NOT_FOUND).status(),
            Some(Status::NOT_FOUND)
        );

        let with_details = NetworkingError::UnsuccessfulWithDetails {
            status: Status::BAD_REQUEST,
            details: Details::from([("error".to_string(), serde_json::json!("x"))]),
        };
        assert_eq!(with_details.status(), Some(Status::BAD_REQUEST));
        assert_eq!(
            with_details.details().and_then(|d| d.get("error")),
            Some(&serde_json::json!("x"))
        );

        assert_eq!(NetworkingError::UnsuitableRequest("x".into()).status(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            NetworkingError::Unsuccessful(Status::NOT_FOUND).to_string(),
            "Unsuccessful: 404 Not Found"
        );
        assert_eq!(
            NetworkingError::UnexpectedMimeType("text/html".into()).to_string(),
            "Unexpected MIME type: text/html"
        );
    }
}
