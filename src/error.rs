//! Error types for apikit
//!
//! One crate-wide error enum and the `Result` alias every fallible
//! operation returns. Failures are never recovered locally; they abort
//! the current fetch and propagate to the caller.

use thiserror::Error;

/// The main error type for apikit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("HTTP {status} from {url}: {body}")]
    RequestFailed {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Malformed response body from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Result extraction error: {message}")]
    Extract { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a failed-request error from a response status
    pub fn request_failed(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            source,
        }
    }

    /// Create an extraction error
    pub fn extract(message: impl Into<String>) -> Self {
        Self::Extract {
            message: message.into(),
        }
    }

    /// The HTTP status carried by this error, if it represents a failed response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for apikit
pub type Result<T> = std::result::Result<T, Error>;
