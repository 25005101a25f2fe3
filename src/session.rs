//! Session manager: current user, login/signup/logout, snapshot persistence.
//!
//! ARCHITECTURE
//! ============
//! One `SessionManager` is built at startup and shared as
//! `Arc<SessionManager>`. Its state lives in a `watch` channel: readers
//! borrow or subscribe, operations mutate with `send_modify`, and no lock is
//! ever held across an `.await`.
//!
//! ```text
//!   restore ──► Authenticated ◄── login
//!                    │
//!                  logout ──► Unauthenticated
//! ```
//!
//! `signup` only writes a row to the store; it never changes session state.
//!
//! ERROR HANDLING
//! ==============
//! Operations never return errors. Every failure is logged, turned into a
//! user-facing [`Notice`], and reported as `false`.
//!
//! TRADE-OFFS
//! ==========
//! Concurrent logins are not serialized: the last one to finish wins, and
//! the first one to finish clears `is_loading`. Signup's username check and
//! insert are separate store calls, so two racing signups can both insert
//! the same username unless the store enforces uniqueness.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::SessionConfig;
use crate::notify::{Notice, Notifier};
use crate::storage::{LocalStorage, StorageError};
use crate::store::{StoreError, UserStore};
use crate::user::{NewUser, User};

/// Point-in-time view of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    /// True while startup restore, login, or signup is running.
    pub is_loading: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session accessed outside of a provided session scope")]
    OutsideScope,
}

/// Compare a stored password to a supplied one.
///
/// Plaintext equality only. This is a placeholder: any real deployment must
/// replace it with a salted one-way hash comparison.
#[must_use]
pub fn passwords_match(stored: &str, supplied: &str) -> bool {
    stored == supplied
}

// =============================================================================
// MANAGER
// =============================================================================

pub struct SessionManager {
    config: SessionConfig,
    store: Arc<dyn UserStore>,
    storage: Arc<dyn LocalStorage>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<Session>,
}

impl SessionManager {
    /// Build the manager and restore any persisted snapshot before returning.
    #[must_use]
    pub fn start(
        config: SessionConfig,
        store: Arc<dyn UserStore>,
        storage: Arc<dyn LocalStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(Session { user: None, is_loading: true });
        let manager = Self { config, store, storage, notifier, state };
        manager.restore();
        Arc::new(manager)
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The authenticated user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Authenticate against the store and persist the session on success.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        let _loading = LoadingGuard::begin(&self.state);

        let record = match self.store.find_by_username(username).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::info!(%username, "login rejected: unknown username");
                self.notifier.notify(&Notice::UsernameNotFound);
                return false;
            }
            Err(e) if e.is_transport() => {
                tracing::error!(error = %e, %username, "login lookup failed");
                self.notifier.notify(&Notice::LoginFailed);
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, %username, "login lookup returned no usable row");
                self.notifier.notify(&Notice::UsernameNotFound);
                return false;
            }
        };

        if !passwords_match(&record.password, password) {
            tracing::info!(%username, "login rejected: wrong password");
            self.notifier.notify(&Notice::WrongPassword);
            return false;
        }

        let user = User::from(record);
        let welcome = Notice::Welcome { name: user.name.clone() };
        self.persist(&user);
        tracing::info!(user_id = %user.id, %username, role = %user.role, "logged in");
        self.state.send_modify(|s| s.user = Some(user));
        self.notifier.notify(&welcome);
        true
    }

    /// Create a store row for a new account. Does not log the user in.
    pub async fn signup(&self, new_user: NewUser) -> bool {
        let _loading = LoadingGuard::begin(&self.state);
        let username = new_user.username.as_str();

        match self.store.find_by_username(username).await {
            Ok(Some(_)) | Err(StoreError::Ambiguous(_)) => {
                tracing::info!(%username, "signup rejected: username taken");
                self.notifier.notify(&Notice::UsernameTaken);
                return false;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, %username, "username check failed; continuing with insert");
            }
        }

        match self.store.insert(&new_user).await {
            Ok(record) => {
                tracing::info!(user_id = %record.id, %username, role = %record.role, "account created");
                self.notifier.notify(&Notice::AccountCreated);
                true
            }
            Err(StoreError::Conflict(body)) => {
                tracing::info!(%username, %body, "signup rejected by store constraint");
                self.notifier.notify(&Notice::UsernameTaken);
                false
            }
            Err(e) if e.is_transport() => {
                tracing::error!(error = %e, %username, "signup request failed");
                self.notifier.notify(&Notice::UnexpectedError);
                false
            }
            Err(e) => {
                tracing::error!(error = %e, %username, "signup insert failed");
                self.notifier.notify(&Notice::SignupFailed);
                false
            }
        }
    }

    /// Clear the session and erase the persisted snapshot. Purely local.
    pub fn logout(&self) {
        self.state.send_modify(|s| s.user = None);
        self.forget_snapshot();
        tracing::info!("logged out");
    }

    // -------------------------------------------------------------------------
    // persistence
    // -------------------------------------------------------------------------

    fn restore(&self) {
        let key = self.config.storage_key.as_str();
        let user = match self.storage.get(key) {
            Ok(Some(raw)) => match User::from_snapshot(&raw) {
                Ok(user) => {
                    tracing::debug!(user_id = %user.id, "session restored");
                    Some(user)
                }
                Err(e) => {
                    tracing::warn!(error = %e, %key, "discarding corrupt session snapshot");
                    self.forget_snapshot();
                    None
                }
            },
            Ok(None) => None,
            Err(e @ StorageError::Corrupt(_)) => {
                tracing::warn!(error = %e, %key, "discarding unreadable session storage");
                self.forget_snapshot();
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, %key, "session storage read failed");
                None
            }
        };
        self.state.send_modify(|s| {
            s.user = user;
            s.is_loading = false;
        });
    }

    fn persist(&self, user: &User) {
        let key = self.config.storage_key.as_str();
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "session snapshot serialize failed");
                self.forget_snapshot();
                return;
            }
        };
        if let Err(e) = self.storage.set(key, &raw) {
            tracing::error!(error = %e, %key, "session snapshot write failed");
            // A snapshot of an earlier user must not outlive this login.
            self.forget_snapshot();
        }
    }

    fn forget_snapshot(&self) {
        let key = self.config.storage_key.as_str();
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!(error = %e, %key, "session snapshot delete failed");
        }
    }
}

/// Holds `is_loading` true until dropped, on every exit path.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<Session>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a watch::Sender<Session>) -> Self {
        state.send_modify(|s| s.is_loading = true);
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.is_loading = false);
    }
}

// =============================================================================
// SCOPE
// =============================================================================

/// Handle through which consumers reach the session manager.
///
/// An empty scope models code running outside the part of the application
/// that was given a session; reaching through it is a contract violation.
#[derive(Clone, Default)]
pub struct SessionScope {
    manager: Option<Arc<SessionManager>>,
}

impl SessionScope {
    #[must_use]
    pub fn provide(manager: Arc<SessionManager>) -> Self {
        Self { manager: Some(manager) }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The provided manager.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::OutsideScope`] if no manager was provided.
    pub fn session(&self) -> Result<&SessionManager, SessionError> {
        self.manager.as_deref().ok_or(SessionError::OutsideScope)
    }

    #[must_use]
    pub fn try_session(&self) -> Option<&Arc<SessionManager>> {
        self.manager.as_ref()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
