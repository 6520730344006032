//! HTTP-facing surface of the adapter.
//!
//! # Data Flow
//! ```text
//! host request ──▶ request.rs (normalize, lazy body)
//!                      │
//!                      ▼
//!                 listener.rs (delegate to protocol handler, contain faults)
//!                      │
//!                      ▼
//!                 response.rs (materialize reply) ──▶ host response
//! ```

pub mod listener;
pub mod request;
pub mod response;

pub use listener::RequestListener;
