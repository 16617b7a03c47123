//! Endpoints and the fetch loop
//!
//! An [`Endpoint`] binds a path on an [`Api`] root to a verb, its own
//! request defaults and a pair of extractors. [`Endpoint::fetch`] runs the
//! whole conversation: merge the configuration layers, send, log the
//! initial exchange, then follow next-page URLs until none remains,
//! concatenating extracted results along the way.

use std::sync::Arc;

use url::Url;

use crate::api::Api;
use crate::error::Result;
use crate::extract::{
    extend_results, IdentityResults, NextUrlExtractor, NoNextUrl, ResultsExtractor,
};
use crate::format;
use crate::http::Exchange;
use crate::merge::RequestLayer;
use crate::types::{JsonValue, LogLevel, Method};

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Everything returned by one fetch call
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Accumulated result set, absent when the initial response had no body
    pub results: Option<JsonValue>,
    /// Request and response records of the initial exchange
    pub exchange: Exchange,
    /// HTTP round-trips performed
    pub pages: u32,
}

// ============================================================================
// Endpoint
// ============================================================================

/// One operation on an API root
///
/// Immutable once built and `Send + Sync`; independent fetch calls may run
/// concurrently on a shared endpoint, each with its own session.
pub struct Endpoint {
    api: Arc<Api>,
    url: Url,
    method: Method,
    defaults: RequestLayer,
    results: Arc<dyn ResultsExtractor>,
    next_url: Arc<dyn NextUrlExtractor>,
}

impl Endpoint {
    /// Bind a path on the given root
    ///
    /// The path resolves against the root's base URL immediately; an
    /// absolute URL is taken as-is.
    pub fn new(api: Arc<Api>, path: &str) -> Result<Self> {
        let url = api.resolve(path)?;
        Ok(Self {
            api,
            url,
            method: Method::default(),
            defaults: RequestLayer::default(),
            results: Arc::new(IdentityResults),
            next_url: Arc::new(NoNextUrl),
        })
    }

    /// The root this endpoint belongs to
    pub fn api(&self) -> &Api {
        &self.api
    }

    /// The resolved absolute URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The configured verb
    pub fn method(&self) -> Method {
        self.method
    }

    /// Endpoint-level request defaults
    pub fn defaults(&self) -> &RequestLayer {
        &self.defaults
    }

    /// Use the given verb instead of GET
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add an endpoint-level default header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.headers.insert(name.into(), value.into());
        self
    }

    /// Add an endpoint-level default query parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.params.insert(name.into(), value.into());
        self
    }

    /// Add an endpoint-level default JSON body field
    #[must_use]
    pub fn with_json_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.defaults.json.insert(name.into(), value.into());
        self
    }

    /// Replace the endpoint-level defaults
    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestLayer) -> Self {
        self.defaults = defaults;
        self
    }

    /// Use the given result extractor
    #[must_use]
    pub fn with_results(mut self, results: impl ResultsExtractor + 'static) -> Self {
        self.results = Arc::new(results);
        self
    }

    /// Use the given next-page extractor
    #[must_use]
    pub fn with_next_url(mut self, next_url: impl NextUrlExtractor + 'static) -> Self {
        self.next_url = Arc::new(next_url);
        self
    }

    /// Fetch with no per-call overrides
    pub async fn fetch(&self) -> Result<FetchOutcome> {
        self.fetch_with(&RequestLayer::default()).await
    }

    /// Run the merge, send and pagination loop for one call
    ///
    /// The initial request carries the merged headers, params and body. Its
    /// exchange is rendered and logged whatever the status (info inside
    /// 2xx, error outside), and only then does a 4xx/5xx fail the call. A
    /// response without content ends the call with no result set;
    /// otherwise the body is parsed, results are extracted and next-page
    /// URLs are followed until they run out. Follow-ups reuse the verb,
    /// carry the merged headers only, fail on 4xx/5xx without being logged
    /// and stop cleanly on an empty body.
    pub async fn fetch_with(&self, overrides: &RequestLayer) -> Result<FetchOutcome> {
        let merged = RequestLayer::merged(self.api.defaults(), &self.defaults, overrides);
        let session = self.api.create_session()?;

        let exchange = session.send(self.method, self.url.clone(), &merged).await?;
        let level = if exchange.response.is_success() {
            LogLevel::Info
        } else {
            LogLevel::Error
        };
        self.api.log(level, &format::request(&exchange.request));
        self.api.log(level, &format::response(&exchange.response));
        exchange.response.error_for_status()?;

        let mut pages = 1;

        if !exchange.response.has_content() {
            return Ok(FetchOutcome {
                results: None,
                exchange,
                pages,
            });
        }

        let body = exchange.response.json()?;
        let mut results = self.results.extract(&body);
        let mut next = self.next_url.next_url(&body);

        // Follow-up pages carry the merged headers only
        let follow_layer = RequestLayer {
            headers: merged.headers,
            ..RequestLayer::default()
        };

        while let Some(next_url) = next {
            let url = self.api.resolve(&next_url)?;
            let follow = session.send(self.method, url, &follow_layer).await?;
            pages += 1;
            follow.response.error_for_status()?;

            if !follow.response.has_content() {
                break;
            }

            let body = follow.response.json()?;
            extend_results(&mut results, self.results.extract(&body))?;
            next = self.next_url.next_url(&body);
        }

        Ok(FetchOutcome {
            results: Some(results),
            exchange,
            pages,
        })
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
