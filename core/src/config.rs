//! Client-wide defaults.

use std::fmt;
use std::sync::Arc;

use crate::transport::Transport;

/// Environment variable read by `ClientConfig::from_env`.
pub const BASE_URL_ENV: &str = "TYPED_REST_BASE_URL";

/// Defaults applied to every call made through a `RestClient`. Per-call
/// `RequestOptions` override these field by field.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub headers: Vec<(String, String)>,
    pub transport: Option<Arc<dyn Transport>>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL from `TYPED_REST_BASE_URL`, plus the blocking `ureq`
    /// transport when that feature is enabled.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).ok().filter(|url| !url.is_empty());
        let config = Self {
            base_url,
            ..Self::default()
        };
        #[cfg(feature = "ureq")]
        let config = config.with_transport(crate::transport::UreqTransport::new());
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("transport", &self.transport.as_ref().map(|_| "<transport>"))
            .finish()
    }
}
