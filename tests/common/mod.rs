//! Shared utilities for listener integration tests.

use std::net::SocketAddr;

use graphql_listener::{Handler, RequestListener};
use tokio::net::TcpListener;

/// Serve a listener on an ephemeral local port and return its address.
pub async fn spawn_listener<H, C>(listener: RequestListener<H, C>) -> SocketAddr
where
    H: Handler<C> + 'static,
    C: Clone + Send + Sync + 'static,
{
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let router = listener.into_router();

    tokio::spawn(async move {
        axum::serve(tcp, router).await.unwrap();
    });

    addr
}
