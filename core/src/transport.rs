//! Pluggable transports.
//!
//! # Design
//! The executor never performs I/O itself; it hands an `HttpRequest` to a
//! `Transport` and waits for the `HttpResponse`. Transports that can answer
//! immediately (an in-process router, a test double) wrap the result in a
//! ready future via `from_fn`, so the executor awaits both kinds the same way.

use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

pub type TransportResult = Result<HttpResponse, TransportError>;

/// Performs the network call for one request.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult> {
        (**self).send(request)
    }
}

/// Adapt a closure that returns its response synchronously.
pub fn from_fn<F>(f: F) -> impl Transport
where
    F: Fn(HttpRequest) -> TransportResult + Send + Sync,
{
    SyncFn(f)
}

/// Adapt a closure that returns a future.
pub fn from_async_fn<F, Fut>(f: F) -> impl Transport
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = TransportResult> + Send + 'static,
{
    AsyncFn(f)
}

struct SyncFn<F>(F);

impl<F> Transport for SyncFn<F>
where
    F: Fn(HttpRequest) -> TransportResult + Send + Sync,
{
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult> {
        future::ready((self.0)(request)).boxed()
    }
}

struct AsyncFn<F>(F);

impl<F, Fut> Transport for AsyncFn<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = TransportResult> + Send + 'static,
{
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult> {
        (self.0)(request).boxed()
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use futures::future::{BoxFuture, FutureExt};

    use super::{Transport, TransportResult};
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Executes requests with a blocking `ureq` agent on tokio's blocking
    /// pool. Polled outside a tokio runtime, the request runs inline on the
    /// polling thread instead.
    ///
    /// Status codes are never turned into errors here; 4xx/5xx responses are
    /// returned as data so the executor can classify them.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult> {
            let agent = self.agent.clone();
            async move {
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => handle
                        .spawn_blocking(move || execute(&agent, request))
                        .await
                        .map_err(|e| TransportError::new(e.to_string()))?,
                    Err(_) => execute(&agent, request),
                }
            }
            .boxed()
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn execute(agent: &ureq::Agent, req: HttpRequest) -> TransportResult {
        let url = req.url.as_str();
        let headers = req.headers.as_slice();
        let body = req.body.as_deref();

        let result = match (req.method, body) {
            (HttpMethod::Get, None) => with_headers(agent.get(url), headers).call(),
            (HttpMethod::Get, Some(body)) => with_headers(agent.get(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Head, None) => with_headers(agent.head(url), headers).call(),
            (HttpMethod::Head, Some(body)) => with_headers(agent.head(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Delete, None) => with_headers(agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(agent.delete(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Post, Some(body)) => with_headers(agent.post(url), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(agent.put(url), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(agent.put(url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => with_headers(agent.patch(url), headers).send(body.as_bytes()),
            (HttpMethod::Patch, None) => with_headers(agent.patch(url), headers).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: body.into(),
        })
    }
}
