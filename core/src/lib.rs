//! Typed REST request executor.
//!
//! # Overview
//! Given a path template such as `/users/:id{[0-9]+}/posts/:slug?`, a method
//! and structured inputs, `RestClient` builds one outbound `HttpRequest`,
//! hands it to a pluggable `Transport`, and classifies the response into a
//! deserialized value or one of three failure kinds: transport failure,
//! HTTP failure (non-2xx) and parse failure (2xx that is not JSON).
//!
//! # Design
//! - Path, query and base-URL resolution are pure functions over the
//!   immutable `RequestSpec`, so everything up to the transport call is
//!   deterministic and testable without I/O.
//! - Transports may answer synchronously or asynchronously; the executor
//!   awaits both the same way.
//! - Response bodies are buffered once as `Bytes`, so classification can
//!   inspect the same body as text and as JSON.
//! - No retries, pooling, streaming or caching: one attempt, one outcome.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod path;
pub mod query;
pub mod request;
pub mod response;
pub mod routes;
pub mod transport;

pub use client::RestClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorBody, HttpFailure, ParseFailure, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::QueryValue;
pub use request::{RequestOptions, RequestSpec};
pub use routes::{Route, RouteParam, RouteRegistry};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
