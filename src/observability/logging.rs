//! Structured logging setup.
//!
//! # Responsibilities
//! - Install the global tracing subscriber
//! - Honor `RUST_LOG`, falling back to crate-local defaults

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directives applied when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "graphql_listener=debug,tower_http=debug";

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops. Hosts that install
/// their own subscriber can skip this entirely.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_DIRECTIVES.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
