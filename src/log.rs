//! Request logging sinks
//!
//! Every initial request/response pair is rendered to text and emitted
//! through the logger owned by the API root. The sink is injected at
//! construction time instead of looked up by name in a global registry:
//! the default forwards to `tracing` under a configurable name, and
//! [`MemoryLogger`] captures lines for programmatic inspection.

use std::sync::{Mutex, PoisonError};

use crate::types::LogLevel;

// ============================================================================
// Logger Trait
// ============================================================================

/// Sink for formatted request/response log lines
pub trait RequestLogger: Send + Sync {
    /// Emit one formatted message at the given level
    fn log(&self, level: LogLevel, message: &str);
}

// ============================================================================
// Tracing Logger
// ============================================================================

/// Logger that forwards lines as `tracing` events
///
/// The configured name rides on every event as the `logger` field, so
/// multiple API roots stay distinguishable in shared output.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    /// Create a logger emitting under the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The name attached to emitted events
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(crate::NAME)
    }
}

impl RequestLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(logger = %self.name, "{}", message),
            LogLevel::Error => tracing::error!(logger = %self.name, "{}", message),
        }
    }
}

// ============================================================================
// Memory Logger
// ============================================================================

/// Logger that captures lines in memory
///
/// Shared between the API root and the code inspecting the capture via
/// `Arc`.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    /// Create an empty capturing logger
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines, in emission order
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of captured lines
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing has been captured yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestLogger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}
