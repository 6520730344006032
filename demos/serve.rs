use futures_util::future::BoxFuture;
use graphql_listener::{
    handler_fn, BoxError, HandlerReply, ListenerConfig, Mode, NormalizedRequest, RequestListener,
    ResponseInit,
};
use std::net::SocketAddr;

/// Stand-in protocol handler: answers every query with a canned envelope.
fn execute(request: &NormalizedRequest) -> BoxFuture<'_, Result<HandlerReply, BoxError>> {
    Box::pin(async move {
        let query = request.body().text().await?;
        println!("{} {} -> {}", request.method(), request.url(), query);

        let mut init = ResponseInit::default();
        init.headers
            .insert("content-type", "application/json".parse()?);
        Ok(("{\"data\":{\"__typename\":\"Query\"}}".to_owned(), init))
    })
}

#[tokio::main]
async fn main() {
    graphql_listener::observability::logging::init();

    let listener = RequestListener::new(
        handler_fn(execute),
        ListenerConfig {
            mode: Mode::from_env(),
        },
    );

    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    println!("GraphQL listener on http://{}", addr);

    let tcp = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(tcp, listener.into_router()).await.unwrap();
}
