//! Normalized request descriptor handed to the protocol handler.
//!
//! # Responsibilities
//! - Validate that the request line carries a method and a URL
//! - Capture method, URL, and headers in a runtime-agnostic form
//! - Expose the original request head for handler-specific extensions
//! - Materialize the request body as text, lazily and at most once
//!
//! # Design Decisions
//! - The body stream is untouched until the handler first asks for it
//! - The drained text is memoized so repeated reads observe one value

use bytes::Bytes;
use http::request::Parts;
use http::HeaderMap;
use http_body::Body;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::BodyExt;
use tokio::sync::{Mutex, OnceCell};

use crate::error::{BoxError, ListenerError, RequestField};

type BoxedIncoming = UnsyncBoxBody<Bytes, BoxError>;

/// Runtime-agnostic request representation consumed by the protocol handler.
///
/// Constructed fresh for each cycle, passed to the handler by shared
/// reference, and dropped when the cycle ends.
pub struct NormalizedRequest<C = ()> {
    url: String,
    method: String,
    headers: HeaderMap,
    body: TextBody,
    raw: Parts,
    context: Option<C>,
}

impl<C> NormalizedRequest<C> {
    /// Validate and build the descriptor from a decomposed host request.
    pub(crate) fn from_parts<B>(
        parts: Parts,
        body: B,
        context: Option<C>,
    ) -> Result<Self, ListenerError>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let method = parts.method.as_str().to_owned();
        let url = parts.uri.to_string();
        require_field(RequestField::Method, &method)?;
        require_field(RequestField::Url, &url)?;

        Ok(Self {
            url,
            method,
            headers: parts.headers.clone(),
            body: TextBody::new(body),
            raw: parts,
            context,
        })
    }

    /// Request URL in string form.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP method in string form.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Lazy request body accessor.
    pub fn body(&self) -> &TextBody {
        &self.body
    }

    /// Original request head, for handler-specific extensions.
    pub fn raw(&self) -> &Parts {
        &self.raw
    }

    /// Caller-supplied context, if the listener was built with one.
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }
}

/// A request-line field counts as missing when its string form is empty.
pub(crate) fn require_field(field: RequestField, value: &str) -> Result<(), ListenerError> {
    if value.is_empty() {
        return Err(ListenerError::MissingRequestField(field));
    }
    Ok(())
}

/// Lazily drained, memoized request body.
///
/// The inbound stream is left untouched until [`text`](Self::text) is first
/// awaited; handlers that never need the body never pay for draining it.
pub struct TextBody {
    text: OnceCell<String>,
    stream: Mutex<Option<BoxedIncoming>>,
}

impl TextBody {
    fn new<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self {
            text: OnceCell::new(),
            stream: Mutex::new(Some(body.map_err(Into::into).boxed_unsync())),
        }
    }

    /// Drain the inbound stream and yield the full body as text.
    ///
    /// The stream is collected chunk by chunk in arrival order, exactly
    /// once; every later call observes the memoized result. A failed drain
    /// is terminal for the cycle: the stream is gone and retries yield
    /// [`ListenerError::BodyConsumed`].
    ///
    /// There is no deadline here. A transport that stalls without erroring
    /// leaves this future pending; bounding that is the host's job.
    pub async fn text(&self) -> Result<&str, ListenerError> {
        let text = self
            .text
            .get_or_try_init(|| async {
                let stream = self
                    .stream
                    .lock()
                    .await
                    .take()
                    .ok_or(ListenerError::BodyConsumed)?;
                let collected = stream.collect().await.map_err(ListenerError::BodyRead)?;
                String::from_utf8(collected.to_bytes().to_vec()).map_err(ListenerError::from)
            })
            .await?;
        Ok(text)
    }
}
