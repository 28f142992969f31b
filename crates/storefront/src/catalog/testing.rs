//! Scripted authenticator for store and state tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

use super::{AuthToken, Authenticator, CatalogError, LoginCredentials};

#[derive(Clone, Copy)]
pub(crate) enum Outcome {
    Token(&'static str),
    Reject,
    Unavailable,
}

struct Scripted {
    outcome: Outcome,
    gate: Option<Arc<Notify>>,
}

/// Authenticator answering per username, optionally waiting on a gate.
///
/// Unknown usernames are rejected.
#[derive(Default)]
pub(crate) struct FakeAuthenticator {
    script: HashMap<&'static str, Scripted>,
    calls: AtomicUsize,
}

impl FakeAuthenticator {
    pub(crate) fn with(mut self, username: &'static str, outcome: Outcome) -> Self {
        self.script.insert(username, Scripted { outcome, gate: None });
        self
    }

    pub(crate) fn gated(
        mut self,
        username: &'static str,
        outcome: Outcome,
        gate: Arc<Notify>,
    ) -> Self {
        self.script.insert(
            username,
            Scripted {
                outcome,
                gate: Some(gate),
            },
        );
        self
    }

    /// Number of authenticate calls started so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Yield until at least one authenticate call has started.
    pub(crate) async fn wait_for_call(&self) {
        while self.calls() == 0 {
            tokio::task::yield_now().await;
        }
    }
}

impl Authenticator for Arc<FakeAuthenticator> {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthToken, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.get(credentials.username.as_str());

        if let Some(gate) = scripted.and_then(|s| s.gate.clone()) {
            gate.notified().await;
        }

        match scripted.map_or(Outcome::Reject, |s| s.outcome) {
            Outcome::Token(token) => Ok(AuthToken {
                token: token.to_string(),
            }),
            Outcome::Reject => Err(CatalogError::InvalidCredentials),
            Outcome::Unavailable => Err(CatalogError::Status {
                status: 503,
                message: "maintenance".to_string(),
            }),
        }
    }
}
