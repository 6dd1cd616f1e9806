//! Error handling for the admin console client

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Message used when neither the payload nor the HTTP status explain a failure
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Unified error type for the admin console client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or transport failure; no response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-2xx status or with `success: false`
    #[error("{message}")]
    Api {
        /// Human-readable message
        message: String,
        /// HTTP status code of the response
        status: u16,
        /// Raw response payload, `{}` when the body was not JSON
        data: Value,
    },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Submitted data is missing required fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// The session store could not be read or written
    #[error("Session store error: {0}")]
    Session(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(msg: T, status: u16, data: Value) -> Self {
        Error::Api {
            message: msg.to_string(),
            status,
            data,
        }
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new session store error
    pub fn session<T: fmt::Display>(msg: T) -> Self {
        Error::Session(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw payload of the failed response
    pub fn data(&self) -> Option<&Value> {
        match self {
            Error::Api { data, .. } => Some(data),
            _ => None,
        }
    }

    /// True for 401 and 403 responses
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
