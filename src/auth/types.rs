//! Types for authentication

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role granting access to the admin console
pub const ADMIN_ROLE: &str = "admin";

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer credential
    #[serde(default)]
    pub token: Option<String>,

    /// The signed-in user, when the backend returns one
    #[serde(default)]
    pub user: Option<User>,
}

/// User data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    /// The user's email address
    #[serde(default)]
    pub email: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// The user's role
    #[serde(default)]
    pub role: Option<String>,

    /// Remaining profile fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Whether this user may use the admin console
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Profile endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// The authenticated user
    pub user: User,
}
