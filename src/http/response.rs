//! Response materialization onto the host response type.
//!
//! # Responsibilities
//! - Carry the handler's response metadata (status, status text, headers)
//! - Write the handler's body and metadata onto an `http::Response`
//!
//! # Design Decisions
//! - Status and headers are forwarded verbatim, with no validation and no
//!   additions of the listener's own
//! - hyper 1.x cannot emit a custom HTTP/1.1 reason phrase, so the
//!   handler's status text travels as a response extension instead

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::Full;

/// Response metadata produced by the protocol handler alongside the body.
#[derive(Debug, Clone, Default)]
pub struct ResponseInit {
    /// Status code, forwarded without validation.
    pub status: StatusCode,

    /// Optional status text, carried as a [`StatusText`] extension.
    pub status_text: Option<String>,

    /// Headers, written onto the response verbatim.
    pub headers: HeaderMap,
}

/// Response extension carrying the handler's status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText(pub String);

/// Write the handler's body and metadata onto a fresh response.
pub(crate) fn materialize(body: String, init: ResponseInit) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = init.status;
    *response.headers_mut() = init.headers;
    if let Some(text) = init.status_text {
        response.extensions_mut().insert(StatusText(text));
    }
    response
}
