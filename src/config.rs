//! Configuration options for the admin console client

use std::collections::HashMap;
use std::path::PathBuf;

/// Backend used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://dumbbers-backend.onrender.com";

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "DUMBBERS_API_BASE";

/// Environment variable holding the session file location
pub const SESSION_FILE_ENV: &str = "DUMBBERS_SESSION_FILE";

/// Configuration options for the admin console client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL prepended to relative request paths
    pub base_url: String,

    /// Where the file-backed session store keeps the credential
    pub session_file: PathBuf,

    /// Headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: default_session_file(None),
            headers: HashMap::new(),
        }
    }
}

impl ClientOptions {
    /// Build options from `DUMBBERS_API_BASE` and `DUMBBERS_SESSION_FILE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut options = Self {
            session_file: default_session_file(get("HOME")),
            ..Self::default()
        };
        if let Some(base_url) = get(BASE_URL_ENV) {
            options = options.with_base_url(&base_url);
        }
        if let Some(path) = get(SESSION_FILE_ENV) {
            options = options.with_session_file(path);
        }
        options
    }

    /// Set the base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim().trim_end_matches('/').to_string();
        self
    }

    /// Set the session file location
    pub fn with_session_file(mut self, value: impl Into<PathBuf>) -> Self {
        self.session_file = value.into();
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    let root = home.map(PathBuf::from).unwrap_or_default();
    root.join(".dumbbers-admin").join("session.json")
}
