//! Call-scoped transport session
//!
//! A session owns the middleware-wrapped HTTP client used for every
//! round-trip of one fetch call. Retries happen inside the middleware
//! stack; auth material is applied to each request as it is built, so
//! pagination follow-ups carry credentials too.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;
use url::Url;

use super::types::{Exchange, RequestRecord, Response, RetryPolicy};
use crate::auth::AuthConfig;
use crate::error::Result;
use crate::merge::RequestLayer;
use crate::types::Method;

/// Transport session for a single fetch call
///
/// Built fresh per call and dropped when the call returns, releasing its
/// connections on success and error alike.
pub struct Session {
    client: ClientWithMiddleware,
    auth: AuthConfig,
}

impl Session {
    /// Build a session from the root's transport settings
    pub(crate) fn new(
        auth: AuthConfig,
        retry: Option<&RetryPolicy>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let mut builder = ClientBuilder::new(client);
        if let Some(policy) = retry {
            builder = builder.with(RetryTransientMiddleware::new_with_policy(policy.backoff()));
        }

        Ok(Self {
            client: builder.build(),
            auth,
        })
    }

    /// Send one request and read the full response
    ///
    /// The layer supplies headers, query parameters and JSON body fields;
    /// an empty body mapping attaches no body at all. The returned exchange
    /// snapshots the request exactly as prepared, auth and serialized body
    /// included. Statuses are recorded, not checked, here.
    pub async fn send(&self, method: Method, url: Url, layer: &RequestLayer) -> Result<Exchange> {
        let mut builder = self.client.request(method.into(), url);

        for (name, value) in &layer.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !layer.params.is_empty() {
            builder = builder.query(&layer.params);
        }
        if !layer.json.is_empty() {
            builder = builder.json(&layer.json);
        }
        builder = self.auth.apply(builder);

        let request = builder.build()?;
        let record = RequestRecord::from_request(&request);
        let response = self.client.execute(request).await?;
        let response = Response::read(response).await?;

        Ok(Exchange {
            request: record,
            response,
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
