//! The request executor.
//!
//! # Design
//! `RestClient` holds only read-only defaults (`ClientConfig`) and an
//! optional route registry; it carries no mutable state between calls, so it
//! can be cloned and shared freely. Every call builds its own `RequestSpec`,
//! makes exactly one transport attempt, and returns exactly one outcome.
//! Retries are left to the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::request::{RequestOptions, RequestSpec};
use crate::response::classify;
use crate::routes::RouteRegistry;

#[derive(Debug, Clone, Default)]
pub struct RestClient {
    config: ClientConfig,
    routes: Option<Arc<RouteRegistry>>,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config, routes: None }
    }

    /// Reject calls to path+method pairs the registry does not declare.
    pub fn with_routes(mut self, routes: RouteRegistry) -> Self {
        self.routes = Some(Arc::new(routes));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn routes(&self) -> Option<&RouteRegistry> {
        self.routes.as_deref()
    }

    /// Resolve `spec` into the request that would be sent, without sending it.
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, ApiError> {
        if let Some(routes) = &self.routes {
            if !routes.contains(spec.method(), spec.path()) {
                return Err(ApiError::UnknownRoute {
                    method: spec.method(),
                    path: spec.path().to_string(),
                });
            }
        }
        spec.prepare(&self.config)
    }

    /// Issue one request. `method` is matched case-insensitively.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        method: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let spec = RequestSpec::new(path, method, options)?;
        self.send(&spec).await
    }

    pub async fn send<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T, ApiError> {
        let request = self.build_request(spec)?;
        let transport = spec
            .transport()
            .or(self.config.transport.as_ref())
            .ok_or(ApiError::NoTransport)?;

        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "dispatching request");

        let response = match transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, %url, error = %err, "transport failed");
                return Err(err.into());
            }
        };

        let status = response.status;
        let outcome = classify(response, method, &url, spec.allow_empty_body());
        match &outcome {
            Ok(_) => debug!(%method, %url, status, "request succeeded"),
            Err(err) => warn!(%method, %url, status, error = %err, "request failed"),
        }
        outcome
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(&RequestSpec::with_method(path, HttpMethod::Get, options)).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(&RequestSpec::with_method(path, HttpMethod::Post, options)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(&RequestSpec::with_method(path, HttpMethod::Put, options)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(&RequestSpec::with_method(path, HttpMethod::Delete, options)).await
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(&RequestSpec::with_method(path, HttpMethod::Patch, options)).await
    }

    pub async fn head<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(&RequestSpec::with_method(path, HttpMethod::Head, options)).await
    }
}
