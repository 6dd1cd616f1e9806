//! Request building and response normalization for the admin API

use log::{debug, warn};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, PRAGMA,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::client::ApiClient;
use crate::error::{Error, Result, FALLBACK_MESSAGE};
use crate::query::to_query;

/// Helper for building and executing a single API request
pub struct FetchBuilder<'a> {
    client: &'a ApiClient,
    url: String,
    method: Method,
    headers: HeaderMap,
    token: Option<String>,
    body: Option<Vec<u8>>,
    error: Option<Error>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub(crate) fn new(client: &'a ApiClient, url: String, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.extend(client.default_headers().clone());

        Self {
            client,
            url,
            method,
            headers,
            token: None,
            body: None,
            error: None,
        }
    }

    /// Add a header to the request, replacing any default of the same name
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                self.error
                    .get_or_insert_with(|| Error::general(format!("invalid header: {}", name)));
            }
        }
        self
    }

    /// Use `token` instead of the session credential for this request
    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Append the non-empty fields of `params` as a query string
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self> {
        let query = to_query(params)?;
        if !query.is_empty() {
            let separator = if self.url.contains('?') { "&" } else { "?" };
            self.url.push_str(separator);
            self.url.push_str(query.trim_start_matches('?'));
        }
        Ok(self)
    }

    /// The URL this request will be sent to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn resolve_token(&self) -> Result<Option<String>> {
        match self.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => Ok(Some(token.to_string())),
            None => self.client.session().token(),
        }
    }

    /// Build the request
    fn build(mut self) -> Result<RequestBuilder> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let url = Url::parse(&self.url)?;
        let token = self.resolve_token()?;
        let mut headers = self.headers;
        if let Some(token) = &token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::auth("stored credential is not a valid header value"))?;
            headers.insert(AUTHORIZATION, value);
        }

        debug!(
            "{} {} (credential attached: {})",
            self.method,
            self.url,
            token.is_some()
        );

        let mut req = self
            .client
            .http_client()
            .request(self.method, url)
            .headers(headers);
        if let Some(body) = self.body {
            req = req.body(body);
        }
        Ok(req)
    }

    /// Execute the request and return the unwrapped payload
    pub async fn execute_value(self) -> Result<Value> {
        let method = self.method.clone();
        let url = self.url.clone();

        let response = self.execute_raw().await.map_err(|err| {
            warn!("{} {} failed: {}", method, url, err);
            err
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        settle(status, parse_payload(&bytes)).map_err(|err| {
            warn!("{} {} returned {}: {}", method, url, status.as_u16(), err);
            err
        })
    }

    /// Execute the request and deserialize the unwrapped payload
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.execute_value().await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Execute the request and return the raw response
    pub async fn execute_raw(self) -> Result<reqwest::Response> {
        let req = self.build()?;
        Ok(req.send().await?)
    }
}

/// Parse a response body, treating anything that is not JSON as `{}`
pub(crate) fn parse_payload(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Turn a status and payload into the call result.
///
/// Fails when the status is outside 2xx or the payload carries
/// `success: false`; otherwise returns the payload's `data` field when it is
/// present and not null, else the whole payload.
pub(crate) fn settle(status: StatusCode, payload: Value) -> Result<Value> {
    let rejected = payload.get("success") == Some(&Value::Bool(false));
    if !status.is_success() || rejected {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason())
            .unwrap_or(FALLBACK_MESSAGE)
            .to_string();
        return Err(Error::api(message, status.as_u16(), payload));
    }

    Ok(match payload {
        Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    })
}
