//! Per-call options and the immutable request description built from them.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::path::{join_base_url, resolve_path, PathParams};
use crate::query::{append_query, QueryParams, QueryValue};
use crate::transport::Transport;

/// Options for a single call. Anything left unset falls back to the
/// client's `ClientConfig`.
#[derive(Clone, Default)]
pub struct RequestOptions {
    base_url: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    headers: Vec<(String, String)>,
    params: PathParams,
    query: QueryParams,
    json: Option<Value>,
    allow_empty_body: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), Some(value.to_string()));
        self
    }

    /// `None` elides an optional `:name?` segment and fails for a required one.
    pub fn optional_param<V: ToString>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.params.insert(name.into(), value.map(|v| v.to_string()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(name.into(), Some(value.into()));
        self
    }

    pub fn optional_query<V: Into<QueryValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.query.insert(name.into(), value.map(Into::into));
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.json = Some(value);
        Ok(self)
    }

    /// Accept HEAD, 204 and 205 responses as success instead of a parse failure.
    pub fn allow_empty_body(mut self, allow: bool) -> Self {
        self.allow_empty_body = allow;
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport.as_ref().map(|_| "<transport>"))
            .field("headers", &self.headers)
            .field("params", &self.params)
            .field("query", &self.query)
            .field("json", &self.json)
            .field("allow_empty_body", &self.allow_empty_body)
            .finish()
    }
}

/// Everything needed to issue one call. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    path: String,
    method: HttpMethod,
    options: RequestOptions,
}

impl RequestSpec {
    /// `method` is matched case-insensitively.
    pub fn new(path: impl Into<String>, method: &str, options: RequestOptions) -> Result<Self, ApiError> {
        Ok(Self::with_method(path, method.parse()?, options))
    }

    pub fn with_method(path: impl Into<String>, method: HttpMethod, options: RequestOptions) -> Self {
        Self {
            path: path.into(),
            method,
            options,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn allow_empty_body(&self) -> bool {
        self.options.allow_empty_body
    }

    pub fn transport(&self) -> Option<&Arc<dyn Transport>> {
        self.options.transport.as_ref()
    }

    /// Path substitution, then query, then base URL. The per-call base URL
    /// takes precedence over `default_base_url`.
    pub fn resolve_url(&self, default_base_url: Option<&str>) -> Result<String, ApiError> {
        let path = resolve_path(&self.path, &self.options.params)?;
        let path = append_query(&path, &self.options.query);
        let base_url = self.options.base_url.as_deref().or(default_base_url);
        Ok(join_base_url(base_url, &path))
    }

    /// Build the outbound request against the client defaults.
    pub fn prepare(&self, config: &ClientConfig) -> Result<HttpRequest, ApiError> {
        let url = self.resolve_url(config.base_url.as_deref())?;
        let mut headers = merge_headers(&config.headers, &self.options.headers);

        let body = match &self.options.json {
            Some(value) => {
                let text = serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))?;
                if !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("content-type")) {
                    headers.push(("Content-Type".to_string(), "application/json".to_string()));
                }
                Some(text)
            }
            None => None,
        };

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}

/// Per-header merge: an override replaces the default with the same name
/// (compared case-insensitively), everything else is kept.
pub fn merge_headers(defaults: &[(String, String)], overrides: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged = defaults.to_vec();
    for (name, value) in overrides {
        match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(entry) => *entry = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}
