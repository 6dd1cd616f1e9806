//! Admin access gate
//!
//! A gate mount moves from [`GateState::Loading`] to either
//! [`GateState::Ok`] or [`GateState::Redirect`], exactly once. Unmounting
//! cancels the check: once [`GateMount::unmount`] returns (or the mount is
//! dropped) no credential is cleared, no navigation happens and the state
//! stays where it was. A navigator may drop the mount from inside
//! [`Navigator::navigate`]; the redirect being applied still completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::{AuthApi, Session, User};
use crate::client::ApiClient;
use crate::router::{Navigator, Route};

/// Outcome of one authorization check
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The credential belongs to an admin
    Admin(User),
    /// Nothing is stored; no request was made
    NoCredential,
    /// The credential was refused or belongs to a non-admin
    Rejected(String),
}

/// State of a mounted gate
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    /// The check is still running; render nothing
    Loading,
    /// An admin is signed in; render the protected children
    Ok(User),
    /// Access was refused and the navigator was sent to this route
    Redirect(Route),
}

/// Guards the protected screens behind an admin profile check
#[derive(Clone)]
pub struct AccessGate {
    client: ApiClient,
}

impl AccessGate {
    /// Create a new gate
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn session(&self) -> &Session {
        self.client.session()
    }

    /// Run the authorization check without side effects
    pub async fn check(&self) -> Verdict {
        match self.session().token() {
            Ok(Some(_)) => {}
            Ok(None) => return Verdict::NoCredential,
            Err(err) => {
                warn!("could not read session: {}", err);
                return Verdict::NoCredential;
            }
        }

        match AuthApi::new(self.client.clone()).profile().await {
            Ok(profile) if profile.user.is_admin() => Verdict::Admin(profile.user),
            Ok(profile) => Verdict::Rejected(format!(
                "role {} is not allowed",
                profile.user.role.as_deref().unwrap_or("<none>")
            )),
            Err(err) => Verdict::Rejected(err.to_string()),
        }
    }

    /// Start the check for a newly mounted protected subtree
    pub fn mount(&self, navigator: Arc<dyn Navigator>) -> GateMount {
        let (tx, rx) = watch::channel(GateState::Loading);
        let liveness = Arc::new(Liveness {
            alive: AtomicBool::new(true),
            applying: Mutex::new(()),
        });

        let gate = self.clone();
        let task_liveness = liveness.clone();
        let task = tokio::spawn(async move {
            let verdict = gate.check().await;

            let _applying = hold(&task_liveness.applying);
            if !task_liveness.alive.load(Ordering::Acquire) {
                debug!("gate unmounted before the check settled");
                return;
            }
            let next = gate.apply(verdict, navigator.as_ref());
            tx.send_replace(next);
        });

        GateMount { liveness, task, rx }
    }

    fn apply(&self, verdict: Verdict, navigator: &dyn Navigator) -> GateState {
        match verdict {
            Verdict::Admin(user) => {
                info!(
                    "admin access granted to {}",
                    user.email.as_deref().unwrap_or("<unknown>")
                );
                GateState::Ok(user)
            }
            Verdict::NoCredential => {
                info!("no stored credential; redirecting to {}", Route::Login);
                navigator.navigate(Route::Login);
                GateState::Redirect(Route::Login)
            }
            Verdict::Rejected(reason) => {
                info!("admin access denied ({}); redirecting to {}", reason, Route::Login);
                if let Err(err) = self.session().clear() {
                    warn!("could not clear rejected credential: {}", err);
                }
                navigator.navigate(Route::Login);
                GateState::Redirect(Route::Login)
            }
        }
    }
}

/// Shared between a mount and its check task.
///
/// `applying` is held while a verdict's side effects run, so dropping the
/// mount from another task waits for them to finish.
struct Liveness {
    alive: AtomicBool,
    applying: Mutex<()>,
}

fn hold(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running gate check, tied to the lifetime of the protected subtree
pub struct GateMount {
    liveness: Arc<Liveness>,
    task: JoinHandle<()>,
    rx: watch::Receiver<GateState>,
}

impl GateMount {
    /// Current state
    pub fn state(&self) -> GateState {
        self.rx.borrow().clone()
    }

    /// Wait until the gate leaves `Loading`
    pub async fn settled(&mut self) -> GateState {
        loop {
            let state = self.state();
            if state != GateState::Loading {
                return state;
            }
            if self.rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    /// Tear the mount down; any pending result is discarded
    pub fn unmount(self) {}
}

impl Drop for GateMount {
    fn drop(&mut self) {
        self.liveness.alive.store(false, Ordering::Release);
        // Inside the check task the lock is already held by the redirect
        // that is dropping us.
        if tokio::task::try_id() != Some(self.task.id()) {
            drop(hold(&self.liveness.applying));
        }
        self.task.abort();
    }
}
