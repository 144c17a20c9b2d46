//! Fluent request builder over a blocking HTTP transport, aimed at test code.
//!
//! # Overview
//! [`RequestBuilder`] accumulates request configuration (base URI, base path,
//! headers, content type, body) through chained setters, pushes it to a
//! [`Transport`] in one explicit `build` step, then `send`s blocking
//! exchanges and records each outcome as a [`ResponseState`].
//!
//! # Design
//! - Staged vs immediate mutation is explicit: every setter buffers into
//!   [`RequestState`] except `set_basic_auth`, which configures the
//!   transport directly.
//! - HTTP error statuses are data, not errors. Only a failure to complete an
//!   exchange surfaces as [`ClientError::Transport`]; `send_expecting` is
//!   the narrow helper that turns an unwanted status into an error.
//! - The transport is a trait seam. [`UreqTransport`] is the real blocking
//!   implementation; tests swap in recording doubles.
//! - [`BuilderRegistry`] hands each execution context its own builder
//!   instead of sharing one through hidden thread-local state.

pub mod builder;
pub mod error;
pub mod http;
pub mod registry;
pub mod state;
pub mod transport;

pub use builder::RequestBuilder;
pub use error::ClientError;
pub use http::{ContentType, HttpMethod, Transport, TransportResponse};
pub use registry::{shared, BuilderRegistry};
pub use state::{RequestState, ResponseState};
pub use transport::UreqTransport;
