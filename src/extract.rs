//! Result-set and next-page extraction
//!
//! Callers describe how to read a result set and a next-page URL out of a
//! parsed response body by supplying extractor implementations. The defaults
//! keep the whole body and never paginate. Closures with the matching
//! signature work as extractors directly.

use crate::error::{Error, Result};
use crate::types::{JsonValue, OptionStringExt};

// ============================================================================
// Extractor Traits
// ============================================================================

/// Pulls the result set out of a parsed page body
pub trait ResultsExtractor: Send + Sync {
    /// Extract the result set from one page
    fn extract(&self, body: &JsonValue) -> JsonValue;
}

/// Computes the next page URL from a parsed page body
pub trait NextUrlExtractor: Send + Sync {
    /// The URL of the page after this one, or `None` on the last page
    fn next_url(&self, body: &JsonValue) -> Option<String>;
}

impl<F> ResultsExtractor for F
where
    F: Fn(&JsonValue) -> JsonValue + Send + Sync,
{
    fn extract(&self, body: &JsonValue) -> JsonValue {
        self(body)
    }
}

impl<F> NextUrlExtractor for F
where
    F: Fn(&JsonValue) -> Option<String> + Send + Sync,
{
    fn next_url(&self, body: &JsonValue) -> Option<String> {
        self(body)
    }
}

// ============================================================================
// Provided Extractors
// ============================================================================

/// Returns the whole body as the result set
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResults;

impl ResultsExtractor for IdentityResults {
    fn extract(&self, body: &JsonValue) -> JsonValue {
        body.clone()
    }
}

/// Reads the result set from a single top-level field
///
/// A missing field extracts as `null`, which the accumulator then rejects
/// on the next concatenation instead of silently dropping a page.
#[derive(Debug, Clone)]
pub struct FieldResults {
    field: String,
}

impl FieldResults {
    /// Extract results from the named top-level field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl ResultsExtractor for FieldResults {
    fn extract(&self, body: &JsonValue) -> JsonValue {
        body.get(&self.field).cloned().unwrap_or(JsonValue::Null)
    }
}

/// Never paginates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNextUrl;

impl NextUrlExtractor for NoNextUrl {
    fn next_url(&self, _body: &JsonValue) -> Option<String> {
        None
    }
}

/// Reads the next page URL from a single top-level string field
///
/// A missing field, JSON `null`, a non-string value and an empty string all
/// mean "no next page".
#[derive(Debug, Clone)]
pub struct FieldNextUrl {
    field: String,
}

impl FieldNextUrl {
    /// Follow the URL found in the named top-level field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl NextUrlExtractor for FieldNextUrl {
    fn next_url(&self, body: &JsonValue) -> Option<String> {
        body.get(&self.field)
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .none_if_empty()
    }
}

// ============================================================================
// Result Accumulation
// ============================================================================

/// Concatenate a freshly extracted page onto the accumulated result set
///
/// Arrays extend, strings append, numbers add (integral when both sides
/// are). Any other pairing is a shape mismatch between pages and fails
/// rather than overwriting accumulated data.
pub fn extend_results(acc: &mut JsonValue, page: JsonValue) -> Result<()> {
    match (&mut *acc, page) {
        (JsonValue::Array(items), JsonValue::Array(more)) => items.extend(more),
        (JsonValue::String(text), JsonValue::String(more)) => text.push_str(&more),
        (JsonValue::Number(current), JsonValue::Number(more)) => {
            *current = add_numbers(current, &more)
                .ok_or_else(|| Error::extract("numeric result sum is not representable"))?;
        }
        (current, page) => {
            return Err(Error::extract(format!(
                "cannot combine {} with {}",
                json_kind(current),
                json_kind(&page)
            )));
        }
    }
    Ok(())
}

/// Add two JSON numbers, staying integral when both sides are
fn add_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Option<serde_json::Number> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Some(sum.into());
        }
    }
    serde_json::Number::from_f64(a.as_f64()? + b.as_f64()?)
}

/// Human-readable name for a JSON value's shape
fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
