// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]

//! # apikit
//!
//! A small toolkit for talking to HTTP APIs: configure an API root once and
//! derive endpoints that fetch paginated result sets, with layered request
//! configuration and per-exchange logging.
//!
//! ## Features
//!
//! - **Layered configuration**: root-level, endpoint-level and per-call
//!   headers, query parameters and JSON body fields, merged per request
//! - **Pagination built in**: follow next-page URLs read from response
//!   bodies and concatenate the extracted results
//! - **Auth material**: API key, basic, bearer and custom-header
//!   credentials applied to every round-trip
//! - **Transport retries**: exponential-backoff retry policy delegated to
//!   the middleware stack
//! - **Exchange records**: every fetch returns the prepared request and
//!   response of its initial exchange, already rendered into the log
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use apikit::{Api, Endpoint, FieldNextUrl, FieldResults, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = Arc::new(
//!         Api::builder("https://acme.com/api/v1/")
//!             .header("Accept", "application/json")
//!             .build()?,
//!     );
//!
//!     let users = Endpoint::new(Arc::clone(&api), "/users/")?
//!         .with_results(FieldResults::new("items"))
//!         .with_next_url(FieldNextUrl::new("next_page"));
//!
//!     let outcome = users.fetch().await?;
//!     println!("fetched {} pages: {:?}", outcome.pages, outcome.results);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Api (base URL, defaults, auth, retry policy, logger)
//!   └─ Endpoint (path, verb, defaults, extractors)
//!        └─ fetch(): merge layers → session → send + log exchange
//!                      └─ follow next URLs, concatenate results
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Layered request configuration and merging
pub mod merge;

/// Result-set and next-page extraction
pub mod extract;

/// Request logging sinks
pub mod log;

/// Request/response log rendering
pub mod format;

/// Request authentication material
pub mod auth;

/// HTTP transport sessions and wire records
pub mod http;

/// API root configuration
pub mod api;

/// Endpoints and the fetch loop
pub mod endpoint;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{Api, ApiBuilder};
pub use auth::{AuthConfig, Location};
pub use endpoint::{Endpoint, FetchOutcome};
pub use extract::{
    FieldNextUrl, FieldResults, IdentityResults, NextUrlExtractor, NoNextUrl, ResultsExtractor,
};
pub use http::{Exchange, RequestRecord, Response, RetryPolicy, Session};
pub use log::{MemoryLogger, RequestLogger, TracingLogger};
pub use merge::RequestLayer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
