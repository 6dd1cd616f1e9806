//! The request client every backend call goes through

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};

use crate::auth::Session;
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::FetchBuilder;

/// HTTP client bound to a base URL and a session
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
    session: Session,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Create a new client
    pub fn new(options: &ClientOptions, session: Session) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("dumbbers-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http_client(options, session, http_client)
    }

    /// Create a new client reusing an existing reqwest client
    pub fn with_http_client(
        options: &ClientOptions,
        session: Session,
        http_client: Client,
    ) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::general(format!("invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::general(format!("invalid value for header {}", name)))?;
            default_headers.insert(name, value);
        }

        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
            default_headers,
        })
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session the client reads its credential from
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub(crate) fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Resolve `path` against the base URL. Absolute `http(s)://` URLs are used as-is.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Start a request with an arbitrary method
    pub fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, self.resolve_url(path), method)
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::POST, path)
    }

    /// Create a PUT request
    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::PUT, path)
    }

    /// Create a DELETE request
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::DELETE, path)
    }
}
