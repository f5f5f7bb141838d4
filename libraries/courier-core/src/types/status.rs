/// HTTP status codes and their classification
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a status code by its hundreds digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseType {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// Anything outside 100..=599
    Unknown,
}

impl ResponseType {
    /// Classify a numeric status code.
    ///
    /// Codes below 100 or above 599 are [`ResponseType::Unknown`].
    pub fn classify(code: u16) -> Self {
        match code / 100 {
            1 => Self::Informational,
            2 => Self::Success,
            3 => Self::Redirection,
            4 => Self::ClientError,
            5 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Shorthand for [`ResponseType::classify`].
pub fn classify(code: u16) -> ResponseType {
    ResponseType::classify(code)
}

/// True iff `code` is a 2xx code.
pub fn is_success(code: u16) -> bool {
    classify(code) == ResponseType::Success
}

/// An HTTP status code.
///
/// Any numeric code can be carried; the well-known ones are available as
/// associated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(u16);

impl Status {
    pub const CONTINUE: Status = Status(100);
    pub const OK: Status = Status(200);
    pub const CREATED: Status = Status(201);
    pub const ACCEPTED: Status = Status(202);
    pub const NO_CONTENT: Status = Status(204);
    pub const PARTIAL_CONTENT: Status = Status(206);
    pub const MOVED_PERMANENTLY: Status = Status(301);
    pub const FOUND: Status = Status(302);
    pub const NOT_MODIFIED: Status = Status(304);
    pub const BAD_REQUEST: Status = Status(400);
    pub const UNAUTHORIZED: Status = Status(401);
    pub const FORBIDDEN: Status = Status(403);
    pub const NOT_FOUND: Status = Status(404);
    pub const CONFLICT: Status = Status(409);
    pub const GONE: Status = Status(410);
    pub const RANGE_NOT_SATISFIABLE: Status = Status(416);
    pub const TOO_MANY_REQUESTS: Status = Status(429);
    pub const INTERNAL_SERVER_ERROR: Status = Status(500);
    pub const BAD_GATEWAY: Status = Status(502);
    pub const SERVICE_UNAVAILABLE: Status = Status(503);
    pub const GATEWAY_TIMEOUT: Status = Status(504);

    /// The canonical reason phrase, if the code is registered.
    pub fn reason_phrase(&self) -> Option<&'static str> {
        StatusCode::from_u16(self.0)
            .ok()
            .and_then(|status| status.canonical_reason())
    }
}

impl Status {
    /// Wrap a raw numeric code.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// The numeric code.
    pub const fn code(&self) -> u16 {
        self.0
    }

    pub fn response_type(&self) -> ResponseType {
        ResponseType::classify(self.0)
    }

    pub fn is_success(&self) -> bool {
        self.response_type() == ResponseType::Success
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason_phrase() {
            Some(phrase) => write!(f, "{} {}", self.0, phrase),
            None => write!(f, "{}", self.0),
        }
    }
}
