//! Authentication and session management

mod session;
mod types;

use log::info;

use crate::client::ApiClient;
use crate::error::{Error, Result};

pub use session::*;
pub use types::*;

/// Login endpoint
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Profile endpoint
pub const PROFILE_PATH: &str = "/api/auth/profile";

/// Client for the auth endpoints
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Create a new AuthApi
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password and persist the returned credential
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self
            .client
            .post(LOGIN_PATH)
            .json(&body)?
            .execute()
            .await?;

        let token = response
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth("Login failed - no token received"))?;
        self.client.session().set_token(token)?;

        info!("signed in as {}", email);
        Ok(response)
    }

    /// Fetch the profile of the current credential
    pub async fn profile(&self) -> Result<Profile> {
        self.client.get(PROFILE_PATH).execute().await
    }

    /// Forget the stored credential
    pub fn logout(&self) -> Result<()> {
        self.client.session().clear()?;
        info!("signed out");
        Ok(())
    }
}
