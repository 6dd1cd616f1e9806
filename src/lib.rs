//! Dumbbers admin console client
//!
//! A Rust client for the Dumbbers store admin API: sign-in, an admin access
//! gate, order browsing and product catalog management. Every backend call
//! goes through [`client::ApiClient`], which attaches the session credential,
//! unwraps the `{success, message, data}` envelope and normalizes failures
//! into [`error::Error`].

pub mod admin;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gate;
pub mod query;
pub mod router;

use log::info;

use crate::admin::AdminApi;
use crate::auth::{AuthApi, LoginResponse, Session};
use crate::client::ApiClient;
use crate::config::ClientOptions;
use crate::error::Result;
use crate::gate::AccessGate;
use crate::router::{Navigator, Route};

/// The main entry point for the admin console client
#[derive(Clone)]
pub struct Console {
    client: ApiClient,
    options: ClientOptions,
}

impl Console {
    /// Create a console for `base_url` with an in-memory session
    ///
    /// # Example
    ///
    /// ```
    /// use dumbbers_admin::Console;
    ///
    /// let console = Console::new("https://dumbbers-backend.onrender.com").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        let options = ClientOptions::default().with_base_url(base_url);
        Self::new_with_options(options, Session::in_memory())
    }

    /// Create a console with custom options and session
    ///
    /// # Example
    ///
    /// ```
    /// use dumbbers_admin::{Console, auth::Session, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_base_url("http://localhost:4000");
    /// let session = Session::file(&options.session_file);
    /// let console = Console::new_with_options(options, session).unwrap();
    /// ```
    pub fn new_with_options(options: ClientOptions, session: Session) -> Result<Self> {
        let client = ApiClient::new(&options, session)?;
        Ok(Self { client, options })
    }

    /// Console configured from the environment, persisting its session on disk
    pub fn from_env() -> Result<Self> {
        let options = ClientOptions::from_env();
        let session = Session::file(&options.session_file);
        Self::new_with_options(options, session)
    }

    /// The request client shared by every API
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The session holding the credential
    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// The options the console was built with
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Auth endpoints
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }

    /// Orders and products endpoints
    pub fn admin(&self) -> AdminApi {
        AdminApi::new(self.client.clone())
    }

    /// Access gate for protected screens
    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.client.clone())
    }

    /// Screen a fresh visit should open
    pub fn landing_route(&self) -> Result<Route> {
        router::landing_route(self.session())
    }

    /// Sign in and move to the dashboard
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        navigator: &dyn Navigator,
    ) -> Result<LoginResponse> {
        let response = self.auth().login(email, password).await?;
        navigator.navigate(Route::Dashboard);
        Ok(response)
    }

    /// Forget the credential and return to the login screen
    pub fn logout(&self, navigator: &dyn Navigator) -> Result<()> {
        self.auth().logout()?;
        info!("redirecting to {}", Route::Login);
        navigator.navigate(Route::Login);
        Ok(())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::admin::{
        DashboardStats, Gender, Order, OrderFilters, OrderStatus, Page, Product, ProductFilters,
        Variant,
    };
    pub use crate::auth::{FileSessionStore, MemorySessionStore, Session, SessionStore, User};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::gate::{AccessGate, GateState, Verdict};
    pub use crate::router::{Navigator, Route};
    pub use crate::Console;
}
