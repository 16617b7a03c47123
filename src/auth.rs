//! Request authentication
//!
//! Static credential material attached to outgoing requests. Protocol flows
//! that mint or refresh tokens live outside this crate; whatever they
//! produce is configured here as a bearer token or custom headers.

use reqwest_middleware::RequestBuilder;
use serde::{Deserialize, Serialize};

use crate::types::StringMap;

/// Placement of an API key on the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// In a request header
    #[default]
    Header,
    /// In the query string
    Query,
}

/// Credential material for one API root
///
/// Opaque to the request core: the only thing ever done with it is applying
/// it to each outgoing request, pagination follow-ups included.
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No credentials
    #[default]
    None,

    /// A key carried in a header or query parameter
    ApiKey {
        /// Where the key goes
        location: Location,
        /// Header carrying the key; `Authorization` when absent
        header_name: Option<String>,
        /// Query parameter carrying the key; `api_key` when absent
        query_param: Option<String>,
        /// Text prepended to the key, e.g. `"Token "`
        prefix: Option<String>,
        /// The key itself
        value: String,
    },

    /// Username and password sent as HTTP Basic
    Basic {
        /// Account name
        username: String,
        /// Account secret
        password: String,
    },

    /// A token sent as a bearer `Authorization` header
    Bearer {
        /// The token, sent as minted
        token: String,
    },

    /// Arbitrary fixed headers
    CustomHeaders {
        /// Headers attached verbatim to each request
        headers: StringMap,
    },
}

impl AuthConfig {
    /// API key sent as a header
    pub fn api_key_header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Header,
            header_name: Some(name.into()),
            query_param: None,
            prefix: None,
            value: value.into(),
        }
    }

    /// API key sent as a query parameter
    pub fn api_key_query(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Query,
            header_name: None,
            query_param: Some(param.into()),
            prefix: None,
            value: value.into(),
        }
    }

    /// HTTP Basic credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Fixed custom headers
    pub fn custom_headers(headers: StringMap) -> Self {
        Self::CustomHeaders { headers }
    }

    /// Attach this configuration to an outgoing request
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            AuthConfig::None => builder,
            AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                prefix,
                value,
            } => {
                let full_value = match prefix {
                    Some(prefix) => format!("{prefix}{value}"),
                    None => value.clone(),
                };
                match location {
                    Location::Header => {
                        let name = header_name.as_deref().unwrap_or("Authorization");
                        builder.header(name, full_value)
                    }
                    Location::Query => {
                        let param = query_param.as_deref().unwrap_or("api_key");
                        builder.query(&[(param, full_value.as_str())])
                    }
                }
            }
            AuthConfig::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            AuthConfig::Bearer { token } => builder.bearer_auth(token),
            AuthConfig::CustomHeaders { headers } => {
                let mut builder = builder;
                for (name, value) in headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder
            }
        }
    }
}
