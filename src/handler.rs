//! Seam for the external GraphQL-over-HTTP protocol handler.
//!
//! # Responsibilities
//! - Define the contract the listener delegates each cycle to
//! - Adapt plain async functions into that contract
//!
//! # Design Decisions
//! - The handler is a black box: the listener forwards its reply verbatim
//!   and contains its faults, nothing more
//! - Handler construction (schema, protocol options) belongs to the
//!   protocol crate, not to this adapter

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::BoxError;
use crate::http::request::NormalizedRequest;
use crate::http::response::ResponseInit;

/// Body and response metadata produced by a protocol handler.
pub type HandlerReply = (String, ResponseInit);

/// Protocol handler invoked once per request cycle.
///
/// Implementations perform the actual GraphQL-over-HTTP semantics: request
/// validation, operation execution, and response shaping. Any returned error
/// is contained by the listener and converted into a 500 response.
#[async_trait]
pub trait Handler<C = ()>: Send + Sync {
    async fn handle(&self, request: &NormalizedRequest<C>) -> Result<HandlerReply, BoxError>;
}

/// Adapt a plain async function into a [`Handler`].
///
/// ```no_run
/// use futures_util::future::BoxFuture;
/// use graphql_listener::{handler_fn, BoxError, HandlerReply, NormalizedRequest, ResponseInit};
///
/// fn execute(request: &NormalizedRequest) -> BoxFuture<'_, Result<HandlerReply, BoxError>> {
///     Box::pin(async move {
///         let query = request.body().text().await?;
///         let body = format!("{{\"data\":null,\"bytes\":{}}}", query.len());
///         Ok((body, ResponseInit::default()))
///     })
/// }
///
/// let _handler = handler_fn(execute);
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn(f)
}

/// [`Handler`] wrapper around a plain async function. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F>(F);

#[async_trait]
impl<C, F> Handler<C> for HandlerFn<F>
where
    C: Send + Sync + 'static,
    F: for<'a> Fn(&'a NormalizedRequest<C>) -> BoxFuture<'a, Result<HandlerReply, BoxError>>
        + Send
        + Sync,
{
    async fn handle(&self, request: &NormalizedRequest<C>) -> Result<HandlerReply, BoxError> {
        (self.0)(request).await
    }
}
