//! Shared types and aliases
//!
//! Small vocabulary used by every other module: JSON aliases, the verb
//! enum endpoints are configured with, and the log level attached to
//! emitted request lines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// A parsed JSON value
pub type JsonValue = serde_json::Value;

/// A JSON object, as found in request bodies and parsed responses
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// String-to-string mapping used for headers and query parameters
pub type StringMap = HashMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
///
/// The closed set of verbs an endpoint can be configured with. Pagination
/// follow-ups reuse the endpoint's verb unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Severity of a request log line
///
/// Successful exchanges (2xx) are logged at `Info`, everything else at
/// `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

// ============================================================================
// Utilities
// ============================================================================

/// Treats empty strings as absent values
pub trait OptionStringExt {
    /// `None` when the contained string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}
