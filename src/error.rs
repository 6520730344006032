//! Error taxonomy and wire payloads for the listener.
//!
//! # Responsibilities
//! - Classify every fault a request cycle can produce
//! - Render faults into the JSON envelope returned in development mode
//!
//! # Design Decisions
//! - Faults never cross the service boundary; they are rendered here
//! - The payload's `stack` field carries the rendered cause chain

use std::error::Error as StdError;
use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

/// Boxed error type used at the handler seam.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Request-line field whose absence terminates a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestField {
    Method,
    Url,
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestField::Method => write!(f, "method"),
            RequestField::Url => write!(f, "URL"),
        }
    }
}

/// Error type for a single request/response cycle.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The inbound request is missing a mandatory request-line field.
    /// Detected before the protocol handler is invoked.
    #[error("request has no {0}")]
    MissingRequestField(RequestField),

    /// The protocol handler returned an error. Opaque to the listener.
    #[error("{0}")]
    Handler(BoxError),

    /// The inbound body stream failed while being drained.
    #[error("failed to read request body: {0}")]
    BodyRead(BoxError),

    /// The request body is not valid UTF-8 text.
    #[error("request body is not valid UTF-8")]
    BodyDecode(#[from] std::string::FromUtf8Error),

    /// The body accessor was invoked again after a failed drain.
    #[error("request body was already consumed by a failed read")]
    BodyConsumed,
}

impl ListenerError {
    /// Render this fault as a wire payload.
    ///
    /// A handler fault is rendered from the handler's own error value so the
    /// payload carries the handler's message, not the listener's framing.
    pub fn payload(&self) -> ErrorPayload {
        match self {
            ListenerError::Handler(inner) => ErrorPayload::from_error(&**inner),
            other => ErrorPayload::from_error(other),
        }
    }
}

/// Single error entry in the failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    /// The fault's display rendering.
    pub message: String,
    /// The fault's rendered cause chain, one cause per line.
    pub stack: String,
}

impl ErrorPayload {
    /// Build a payload from any error value.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let message = err.to_string();
        let mut stack = message.clone();
        let mut cause = err.source();
        while let Some(inner) = cause {
            let _ = write!(stack, "\ncaused by: {inner}");
            cause = inner.source();
        }
        Self { message, stack }
    }
}

/// Envelope wrapping failure payloads on the wire.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorPayload>,
}

impl From<&ListenerError> for ErrorEnvelope {
    fn from(err: &ListenerError) -> Self {
        Self {
            errors: vec![err.payload()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Error)]
    #[error("query execution failed")]
    struct ExecutionError {
        #[source]
        source: std::io::Error,
    }

    #[test]
    fn test_handler_fault_uses_inner_message() {
        let fault = ListenerError::Handler(Box::new(std::io::Error::other("boom")));
        let payload = fault.payload();
        assert_eq!(payload.message, "boom");
        assert_eq!(payload.stack, "boom");
    }

    #[test]
    fn test_stack_renders_cause_chain() {
        let inner = ExecutionError {
            source: std::io::Error::other("connection reset"),
        };
        let fault = ListenerError::Handler(Box::new(inner));
        let payload = fault.payload();
        assert_eq!(payload.message, "query execution failed");
        assert_eq!(
            payload.stack,
            "query execution failed\ncaused by: connection reset"
        );
    }

    #[test]
    fn test_envelope_wire_shape() {
        let fault = ListenerError::MissingRequestField(RequestField::Url);
        let envelope = ErrorEnvelope::from(&fault);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "errors": [{
                    "message": "request has no URL",
                    "stack": "request has no URL",
                }]
            })
        );
    }
}
