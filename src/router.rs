//! Console screens and navigation

use std::fmt;

use crate::auth::Session;
use crate::error::Result;

/// A screen of the admin console
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Orders,
    OrderDetail(String),
    Products,
    ProductNew,
    ProductEdit(String),
}

impl Route {
    /// URL path of the screen
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/admin".to_string(),
            Route::Orders => "/admin/orders".to_string(),
            Route::OrderDetail(id) => format!("/admin/orders/{}", id),
            Route::Products => "/admin/products".to_string(),
            Route::ProductNew => "/admin/products/new".to_string(),
            Route::ProductEdit(id) => format!("/admin/products/{}", id),
        }
    }

    /// Whether the screen sits behind the access gate
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the user between screens
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Where a fresh visit starts: the dashboard when a credential is stored,
/// otherwise the login screen
pub fn landing_route(session: &Session) -> Result<Route> {
    if session.is_present()? {
        Ok(Route::Dashboard)
    } else {
        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStore;

    #[test]
    fn paths() {
        assert_eq!(Route::Dashboard.path(), "/admin");
        assert_eq!(Route::OrderDetail("o1".into()).to_string(), "/admin/orders/o1");
        assert_eq!(Route::ProductNew.path(), "/admin/products/new");
        assert!(!Route::Login.is_protected());
        assert!(Route::ProductEdit("p1".into()).is_protected());
    }

    #[test]
    fn landing_depends_on_credential() {
        assert_eq!(landing_route(&Session::in_memory()).unwrap(), Route::Login);

        let session = Session::new(MemorySessionStore::with_token("abc"));
        assert_eq!(landing_route(&session).unwrap(), Route::Dashboard);
    }
}
