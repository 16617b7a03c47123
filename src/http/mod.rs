//! HTTP transport module
//!
//! The collaborator the client core delegates wire work to: a call-scoped
//! [`Session`] over a retry-capable middleware client, plus plain records
//! of what was sent and received.

mod session;
mod types;

pub use session::Session;
pub use types::{Exchange, RequestRecord, Response, RetryPolicy};
