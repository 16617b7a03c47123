//! API root configuration
//!
//! An [`Api`] captures everything shared by the endpoints of one service:
//! the base URL, default request layers, credential material, the retry
//! policy handed to the transport and the log sink. Roots are built once,
//! wrapped in an `Arc` and shared by any number of endpoints.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{RetryPolicy, Session};
use crate::log::{RequestLogger, TracingLogger};
use crate::merge::RequestLayer;
use crate::types::{JsonValue, LogLevel};

/// Shared configuration for one HTTP API
pub struct Api {
    base_url: String,
    defaults: RequestLayer,
    auth: AuthConfig,
    retry: Option<RetryPolicy>,
    timeout: Duration,
    user_agent: String,
    logger: Arc<dyn RequestLogger>,
}

impl Api {
    /// Start building an API root for the given base URL
    pub fn builder(base_url: impl Into<String>) -> ApiBuilder {
        ApiBuilder::new(base_url)
    }

    /// The base URL endpoint paths resolve against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Root-level request defaults
    pub fn defaults(&self) -> &RequestLayer {
        &self.defaults
    }

    /// Credential material applied to every request
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Retry policy handed to sessions, if any
    pub fn retry(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// Per-request transport timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// User agent sent by sessions
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Resolve a path or URL against this root
    ///
    /// Absolute URLs pass through untouched. Anything else is appended to
    /// the base URL with exactly one slash between, so a base with a path
    /// keeps it: `/a/b/` against `https://x.com/api/v1/` resolves to
    /// `https://x.com/api/v1/a/b/`. The same rule covers relative
    /// next-page URLs.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Create a transport session carrying this root's auth and retry policy
    ///
    /// Sessions are call-scoped: each fetch builds one, keeps it for every
    /// page of that call and drops it on return.
    pub fn create_session(&self) -> Result<Session> {
        Session::new(
            self.auth.clone(),
            self.retry.as_ref(),
            self.timeout,
            &self.user_agent,
        )
    }

    pub(crate) fn log(&self, level: LogLevel, message: &str) {
        self.logger.log(level, message);
    }
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("base_url", &self.base_url)
            .field("defaults", &self.defaults)
            .field("auth", &self.auth)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Api`]
pub struct ApiBuilder {
    api: Api,
}

impl ApiBuilder {
    /// Create a builder with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: Api {
                base_url: base_url.into(),
                defaults: RequestLayer::default(),
                auth: AuthConfig::None,
                retry: None,
                timeout: Duration::from_secs(30),
                user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
                logger: Arc::new(TracingLogger::default()),
            },
        }
    }

    /// Add a default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.api.defaults.headers.insert(name.into(), value.into());
        self
    }

    /// Add a default query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.api.defaults.params.insert(name.into(), value.into());
        self
    }

    /// Add a default JSON body field
    pub fn json_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.api.defaults.json.insert(name.into(), value.into());
        self
    }

    /// Replace the whole default layer
    pub fn defaults(mut self, defaults: RequestLayer) -> Self {
        self.api.defaults = defaults;
        self
    }

    /// Set the credential material
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.api.auth = auth;
        self
    }

    /// Enable transport retries with the given policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.api.retry = Some(policy);
        self
    }

    /// Set the per-request transport timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.api.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.api.user_agent = agent.into();
        self
    }

    /// Set the log sink
    pub fn logger(mut self, logger: Arc<dyn RequestLogger>) -> Self {
        self.api.logger = logger;
        self
    }

    /// Log through `tracing` under the given name
    pub fn logger_name(mut self, name: impl Into<String>) -> Self {
        self.api.logger = Arc::new(TracingLogger::new(name));
        self
    }

    /// Validate and build the root
    pub fn build(self) -> Result<Api> {
        if self.api.base_url.is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        Url::parse(&self.api.base_url)?;
        Ok(self.api)
    }
}
