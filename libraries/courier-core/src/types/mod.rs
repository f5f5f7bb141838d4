mod headers;
mod mime;
mod request;
mod status;

pub use headers::{Header, Headers};
pub use mime::{essence, ContentEncoding, HeaderField, Method, MimeType};
pub use request::{HttpResponse, Request};
pub use status::{classify, is_success, ResponseType, Status};
