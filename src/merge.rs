//! Layered request configuration
//!
//! A request is described by three stacked layers: API-root defaults,
//! endpoint defaults, and per-call overrides. Headers, query parameters and
//! JSON body fields each merge independently under the same rule, with later
//! layers overwriting earlier ones on key collision.

use serde::{Deserialize, Serialize};

use crate::types::{JsonObject, JsonValue, StringMap};

// ============================================================================
// Request Layer
// ============================================================================

/// One layer of request configuration
///
/// Holds the headers, query parameters and JSON body fields contributed by a
/// single level (root, endpoint or call). Layers are plain data; the merge
/// in [`RequestLayer::merged`] copies them and never mutates its inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestLayer {
    /// HTTP headers contributed by this layer
    #[serde(default)]
    pub headers: StringMap,
    /// Query parameters contributed by this layer
    #[serde(default)]
    pub params: StringMap,
    /// JSON body fields contributed by this layer
    #[serde(default)]
    pub json: JsonObject,
}

impl RequestLayer {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header to this layer
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter to this layer
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add a JSON body field to this layer
    #[must_use]
    pub fn with_json_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.json.insert(name.into(), value.into());
        self
    }

    /// True when the layer contributes nothing
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.params.is_empty() && self.json.is_empty()
    }

    /// Overlay three layers into the effective per-request configuration
    ///
    /// Each mapping starts empty, takes the root entries, then the endpoint
    /// entries, then the call entries. On collision the later layer wins,
    /// so precedence is call > endpoint > root. Key order is not
    /// significant.
    pub fn merged(
        root: &RequestLayer,
        endpoint: &RequestLayer,
        call: &RequestLayer,
    ) -> RequestLayer {
        RequestLayer {
            headers: overlay([&root.headers, &endpoint.headers, &call.headers]),
            params: overlay([&root.params, &endpoint.params, &call.params]),
            json: overlay([&root.json, &endpoint.json, &call.json]),
        }
    }
}

/// Copy the given layers into a fresh mapping, later entries overwriting
/// earlier ones.
fn overlay<'a, M, V>(layers: [&'a M; 3]) -> M
where
    M: Default + Extend<(String, V)>,
    &'a M: IntoIterator<Item = (&'a String, &'a V)>,
    V: Clone + 'a,
{
    let mut merged = M::default();
    for layer in layers {
        merged.extend(layer.into_iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}
