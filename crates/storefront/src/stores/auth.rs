//! Auth store: the signed-in session.
//!
//! The session triple (token, username, authenticated flag) always changes as
//! a unit. `is_authenticated` is true only when both the token and the
//! username are present and non-empty; rehydration enforces this on records
//! written by older or hand-edited files.
//!
//! Overlapping [`AuthStore::login`] calls are resolved with a generation
//! counter: only the response to the most recently issued call may touch
//! state. Earlier responses are dropped and their calls return `false`.
//!
//! Blank form fields are caught by [`shopfront_core::LoginForm::validate`]
//! before the store is called; the store itself only records service errors.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Authenticator, CatalogClient, LoginCredentials};
use crate::storage::{AUTH_KEY, Storage, load_record, save_record};

/// Persisted part of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    token: Option<String>,
    username: Option<String>,
    is_authenticated: bool,
}

impl SessionRecord {
    fn is_consistent(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        self.is_authenticated == (present(&self.token) && present(&self.username))
    }
}

/// Read-only view of the auth store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
    pub is_authenticated: bool,
    /// True while a login call is in flight. Never persisted.
    pub is_loading: bool,
    /// Message from the last failed login. Never persisted.
    pub error: Option<String>,
}

struct AuthState {
    record: SessionRecord,
    is_loading: bool,
    error: Option<String>,
    generation: u64,
}

/// Handle to the auth store. Clones share state.
pub struct AuthStore<A: Authenticator = CatalogClient> {
    inner: Arc<AuthStoreInner<A>>,
}

impl<A: Authenticator> Clone for AuthStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AuthStoreInner<A> {
    authenticator: A,
    storage: Arc<dyn Storage>,
    state: RwLock<AuthState>,
}

impl<A: Authenticator> AuthStore<A> {
    /// Create the store and rehydrate the session from `storage`.
    ///
    /// An inconsistent record is discarded and overwritten with a cleared one.
    #[must_use]
    pub fn new(authenticator: A, storage: Arc<dyn Storage>) -> Self {
        let loaded = load_record::<SessionRecord>(storage.as_ref(), AUTH_KEY);
        let discarded = loaded.as_ref().is_some_and(|record| !record.is_consistent());
        let record = loaded
            .filter(SessionRecord::is_consistent)
            .unwrap_or_default();

        let store = Self {
            inner: Arc::new(AuthStoreInner {
                authenticator,
                storage,
                state: RwLock::new(AuthState {
                    record,
                    is_loading: false,
                    error: None,
                    generation: 0,
                }),
            }),
        };

        if discarded {
            warn!("Discarding inconsistent persisted session");
            store.reset();
        }
        debug!(authenticated = store.is_authenticated(), "Session rehydrated");
        store
    }

    fn save(&self, record: &SessionRecord) {
        save_record(self.inner.storage.as_ref(), AUTH_KEY, record);
    }

    /// Exchange credentials for a session.
    ///
    /// Returns `true` if this call signed the user in. Failures are recorded
    /// in [`Session::error`] and never returned as errors. The username is
    /// sent and stored exactly as given.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        let generation = {
            let mut state = self.inner.state.write();
            state.generation += 1;
            state.is_loading = true;
            state.error = None;
            state.generation
        };

        let credentials = LoginCredentials::new(username, password);
        let result = self.inner.authenticator.authenticate(&credentials).await;

        let mut state = self.inner.state.write();
        if state.generation != generation {
            debug!(username, generation, "Discarding superseded login response");
            return false;
        }
        state.is_loading = false;

        match result {
            Ok(token) => {
                state.record = SessionRecord {
                    token: Some(token.token),
                    username: Some(username.to_string()),
                    is_authenticated: true,
                };
                state.error = None;
                self.save(&state.record);
                info!(username, "Signed in");
                true
            }
            Err(e) => {
                warn!(username, error = %e, "Login failed");
                state.record = SessionRecord::default();
                state.error = Some(e.to_string());
                self.save(&state.record);
                false
            }
        }
    }

    /// Clear the session and any error. No network call.
    pub fn logout(&self) {
        let mut state = self.inner.state.write();
        state.record = SessionRecord::default();
        state.error = None;
        self.save(&state.record);
        info!("Signed out");
    }

    /// Clear the error, leaving the session untouched.
    pub fn clear_error(&self) {
        self.inner.state.write().error = None;
    }

    /// Clear everything, including a pending login.
    ///
    /// Any login still in flight becomes superseded and will not apply.
    /// Rehydration uses this to replace a discarded record.
    pub fn reset(&self) {
        let mut state = self.inner.state.write();
        state.generation += 1;
        state.record = SessionRecord::default();
        state.is_loading = false;
        state.error = None;
        self.save(&state.record);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Consistent copy of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        let state = self.inner.state.read();
        Session {
            token: state.record.token.clone(),
            username: state.record.username.clone(),
            is_authenticated: state.record.is_authenticated,
            is_loading: state.is_loading,
            error: state.error.clone(),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().record.is_authenticated
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.inner.state.read().record.username.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.state.read().record.token.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.read().is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.read().error.clone()
    }
}
