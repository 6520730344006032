//! Request listener adapter.
//!
//! # Responsibilities
//! - Normalize inbound requests for the protocol handler
//! - Delegate to the handler and write its reply onto the response
//! - Contain every per-cycle fault behind a fallback 500 response
//!
//! # Design Decisions
//! - The whole cycle runs inside one result boundary, matched once at the
//!   outer edge; the tower `Service` error type is `Infallible`
//! - Nothing is retried; a fault is terminal for its own cycle only

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{header, HeaderValue, Request, Response, StatusCode};
use http_body::Body;
use http_body_util::Full;
use tower::Service;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ListenerConfig;
use crate::error::{BoxError, ErrorEnvelope, ListenerError};
use crate::handler::Handler;
use crate::http::request::NormalizedRequest;
use crate::http::response;
use crate::observability::metrics;

/// Adapter exposing a protocol handler as a host-compatible request
/// listener.
///
/// One listener serves any number of concurrent cycles. It holds no mutable
/// state; each cycle exclusively owns its request and response, so cycles
/// interleave freely without coordination.
pub struct RequestListener<H, C = ()> {
    handler: Arc<H>,
    config: ListenerConfig,
    context: Option<C>,
}

impl<H> RequestListener<H> {
    /// Create a listener around a protocol handler.
    pub fn new(handler: H, config: ListenerConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            config,
            context: None,
        }
    }
}

impl<H, C> RequestListener<H, C> {
    /// Attach a caller-supplied context, cloned into every cycle's
    /// descriptor for the handler to consume.
    pub fn with_context<T>(self, context: T) -> RequestListener<H, T> {
        RequestListener {
            handler: self.handler,
            config: self.config,
            context: Some(context),
        }
    }

    /// Listener configuration.
    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }
}

impl<H, C: Clone> Clone for RequestListener<H, C> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: self.config.clone(),
            context: self.context.clone(),
        }
    }
}

impl<H, C> RequestListener<H, C>
where
    H: Handler<C>,
    C: Clone + Send + Sync,
{
    /// Run one full request/response cycle.
    ///
    /// Never fails: every fault is logged once and converted into the
    /// mode-appropriate 500 response, so nothing propagates to the host.
    pub async fn handle_request<B>(&self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let method = request.method().to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %request.uri(),
            "Dispatching request to protocol handler"
        );

        match self.process(request).await {
            Ok(resp) => {
                metrics::record_request(&method, resp.status().as_u16(), started);
                resp
            }
            Err(fault) => {
                tracing::error!(
                    request_id = %request_id,
                    error = %fault,
                    "Internal error while handling request"
                );
                metrics::record_request(
                    &method,
                    StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    started,
                );
                metrics::record_failure(&method);
                self.failure_response(&fault)
            }
        }
    }

    /// Normalize, delegate, materialize. Every fault funnels back to the
    /// single match in [`handle_request`](Self::handle_request).
    async fn process<B>(&self, request: Request<B>) -> Result<Response<Full<Bytes>>, ListenerError>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = request.into_parts();
        let normalized = NormalizedRequest::from_parts(parts, body, self.context.clone())?;
        let (body, init) = self
            .handler
            .handle(&normalized)
            .await
            .map_err(ListenerError::Handler)?;
        Ok(response::materialize(body, init))
    }

    /// Fallback response for a contained fault.
    ///
    /// Production mode sends a bare 500. Development mode attaches the
    /// fault's message and cause chain as a JSON envelope; if serializing
    /// that envelope fails, the bare 500 still goes out and the secondary
    /// failure is logged once at `warn`.
    fn failure_response(&self, fault: &ListenerError) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::default());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        if self.config.mode.is_production() {
            return response;
        }

        let envelope = ErrorEnvelope::from(fault);
        match serde_json::to_vec(&envelope) {
            Ok(body) => {
                *response.body_mut() = Full::new(Bytes::from(body));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize error payload");
            }
        }
        response
    }
}

impl<H, C> RequestListener<H, C>
where
    H: Handler<C> + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Mount the listener as the sole service of a fresh axum router.
    ///
    /// Routes every method and path to the listener and wraps the stack in
    /// request tracing. Hosts that drive hyper directly can use the
    /// [`tower::Service`] impl instead.
    pub fn into_router(self) -> axum::Router {
        axum::Router::new()
            .fallback_service(self)
            .layer(TraceLayer::new_for_http())
    }
}

impl<H, C, B> Service<Request<B>> for RequestListener<H, C>
where
    H: Handler<C> + 'static,
    C: Clone + Send + Sync + 'static,
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let listener = self.clone();
        Box::pin(async move { Ok(listener.handle_request(request).await) })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use http::HeaderMap;
    use http_body_util::BodyExt;

    use super::*;
    use crate::config::Mode;
    use crate::error::RequestField;
    use crate::handler::{handler_fn, HandlerReply};
    use crate::http::response::{ResponseInit, StatusText};

    /// Replies with a fixed body and init, counting invocations.
    struct StaticHandler {
        body: String,
        init: ResponseInit,
        calls: AtomicUsize,
    }

    impl StaticHandler {
        fn new(body: &str, init: ResponseInit) -> Self {
            Self {
                body: body.to_owned(),
                init,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Handler for StaticHandler {
        async fn handle(
            &self,
            _request: &NormalizedRequest,
        ) -> Result<HandlerReply, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.body.clone(), self.init.clone()))
        }
    }

    /// Rejects every cycle with a fixed error message.
    struct FailingHandler;

    #[async_trait]
    impl Handler for FailingHandler {
        async fn handle(
            &self,
            _request: &NormalizedRequest,
        ) -> Result<HandlerReply, BoxError> {
            Err(Box::new(std::io::Error::other("boom")))
        }
    }

    fn post_graphql(body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method("POST")
            .uri("/graphql")
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_success_forwards_handler_reply_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let init = ResponseInit {
            status: StatusCode::OK,
            status_text: Some("OK".to_owned()),
            headers: headers.clone(),
        };
        let listener = RequestListener::new(
            StaticHandler::new("{\"data\":{\"__typename\":\"Query\"}}", init),
            ListenerConfig::default(),
        );

        let response = listener
            .handle_request(post_graphql("{\"query\":\"{__typename}\"}"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers(), &headers);
        assert_eq!(
            response.extensions().get::<StatusText>(),
            Some(&StatusText("OK".to_owned()))
        );
        assert_eq!(listener.handler.calls.load(Ordering::SeqCst), 1);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"{\"data\":{\"__typename\":\"Query\"}}"));
    }

    #[tokio::test]
    async fn test_handler_sees_normalized_request() {
        fn echo(request: &NormalizedRequest) -> BoxFuture<'_, Result<HandlerReply, BoxError>> {
            Box::pin(async move {
                let body = request.body().text().await?;
                // Value is memoized; a second read observes the same text.
                assert_eq!(request.body().text().await?, body);
                let reply = format!("{} {} {}", request.method(), request.url(), body);
                Ok((reply, ResponseInit::default()))
            })
        }

        let listener = RequestListener::new(handler_fn(echo), ListenerConfig::default());
        let response = listener
            .handle_request(post_graphql("{\"query\":\"{__typename}\"}"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            body,
            Bytes::from_static(b"POST /graphql {\"query\":\"{__typename}\"}")
        );
    }

    #[tokio::test]
    async fn test_handler_fault_development_mode() {
        let listener = RequestListener::new(
            FailingHandler,
            ListenerConfig {
                mode: Mode::Development,
            },
        );

        let response = listener.handle_request(post_graphql("{}")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["errors"][0]["message"], "boom");
        assert_eq!(value["errors"][0]["stack"], "boom");
    }

    #[tokio::test]
    async fn test_handler_fault_production_mode() {
        let listener = RequestListener::new(FailingHandler, ListenerConfig::default());

        let response = listener.handle_request(post_graphql("{}")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().is_empty());

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_missing_field_fault_is_a_bare_500_in_production() {
        let listener = RequestListener::new(FailingHandler, ListenerConfig::default());

        let fault = ListenerError::MissingRequestField(RequestField::Url);
        let response = listener.failure_response(&fault);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().is_empty());
    }

    #[tokio::test]
    async fn test_context_is_cloned_into_each_cycle() {
        struct TenantHandler;

        #[async_trait]
        impl Handler<String> for TenantHandler {
            async fn handle(
                &self,
                request: &NormalizedRequest<String>,
            ) -> Result<HandlerReply, BoxError> {
                let tenant = request.context().cloned().unwrap_or_default();
                Ok((tenant, ResponseInit::default()))
            }
        }

        let listener = RequestListener::new(TenantHandler, ListenerConfig::default())
            .with_context("tenant-a".to_owned());

        let response = listener.handle_request(post_graphql("{}")).await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"tenant-a"));
    }
}
