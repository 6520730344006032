//! GraphQL-over-HTTP request listener adapter.
//!
//! Exposes a protocol-agnostic GraphQL-over-HTTP handler as a request
//! listener for the hyper/axum server runtime. The adapter owns the
//! request/response translation and the failure containment; the protocol
//! semantics (validation, execution, response shaping) live behind the
//! [`Handler`] seam.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌─────────────────────────────────────────┐
//!                   │            REQUEST LISTENER             │
//!                   │                                         │
//!    Host request   │  ┌───────────┐      ┌────────────┐      │
//!    ───────────────┼─▶│ normalize │─────▶│  protocol  │      │
//!                   │  │ +validate │      │  handler   │      │
//!                   │  └─────┬─────┘      └─────┬──────┘      │
//!                   │        │ fault            │ reply       │
//!                   │        ▼                  ▼             │
//!    Host response  │  ┌───────────┐      ┌────────────┐      │
//!    ◀──────────────┼──│ fail-safe │◀─────│materialize │      │
//!                   │  │   (500)   │ fault│  response  │      │
//!                   │  └───────────┘      └────────────┘      │
//!                   └─────────────────────────────────────────┘
//! ```
//!
//! Every fault raised during a cycle is contained inside the listener and
//! converted into a 500 response; the tower `Service` error type is
//! `Infallible`, so the host server is never destabilized by a request.

// Core subsystems
pub mod config;
pub mod error;
pub mod handler;
pub mod http;

// Cross-cutting concerns
pub mod observability;

pub use config::{ListenerConfig, Mode};
pub use error::{BoxError, ErrorPayload, ListenerError};
pub use handler::{handler_fn, Handler, HandlerFn, HandlerReply};
pub use self::http::listener::RequestListener;
pub use self::http::request::{NormalizedRequest, TextBody};
pub use self::http::response::{ResponseInit, StatusText};
