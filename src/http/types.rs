//! Transport data types
//!
//! Plain records of what went over the wire, plus the retry policy handed
//! down to the transport middleware.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use reqwest_retry::policies::ExponentialBackoff;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::types::JsonValue;

// ============================================================================
// Retry Policy
// ============================================================================

/// Retry policy delegated to the transport middleware
///
/// Retrying is entirely the transport's concern; this type only carries the
/// knobs. Transient failures (connection errors, 429 and 5xx statuses) are
/// retried with exponential backoff between the configured bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Initial backoff delay
    pub min_backoff: Duration,
    /// Backoff delay ceiling
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy retrying up to `max_retries` times with default backoff bounds
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// The middleware backoff policy this configuration describes
    pub(crate) fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .retry_bounds(self.min_backoff, self.max_backoff)
            .build_with_max_retries(self.max_retries)
    }
}

// ============================================================================
// Wire Records
// ============================================================================

/// Snapshot of a prepared request, taken right before it was sent
///
/// Reflects everything the transport resolved: applied auth headers, the
/// encoded query string in the URL and the serialized body.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    /// HTTP method
    pub method: reqwest::Method,
    /// Full URL, query string included
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Serialized body, if one was attached
    pub body: Option<Bytes>,
}

impl RequestRecord {
    pub(crate) fn from_request(request: &reqwest::Request) -> Self {
        Self {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(Bytes::copy_from_slice),
        }
    }
}

/// A completed response with its body fully read
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub(crate) fn new(status: StatusCode, url: Url, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            url,
            headers,
            body,
        }
    }

    /// Drain a transport response into an owned record
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self::new(status, url, headers, body))
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// URL the response came from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// True for 4xx and 5xx statuses
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// True when the body is non-empty
    pub fn has_content(&self) -> bool {
        !self.body.is_empty()
    }

    /// Body as text, lossy on invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<JsonValue> {
        serde_json::from_slice(&self.body).map_err(|e| Error::malformed(self.url.as_str(), e))
    }

    /// Fail with the recorded status and body on 4xx/5xx
    pub fn error_for_status(&self) -> Result<()> {
        if self.is_error() {
            return Err(Error::request_failed(
                self.status.as_u16(),
                self.url.as_str(),
                self.text(),
            ));
        }
        Ok(())
    }
}

/// A prepared request and the response it produced
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The request as it went over the wire
    pub request: RequestRecord,
    /// The response that came back
    pub response: Response,
}
