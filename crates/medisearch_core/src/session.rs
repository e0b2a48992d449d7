//! crates/medisearch_core/src/session.rs
//!
//! The session context: the single answer to "who is signed in" for one client.
//!
//! State moves `Loading -> Authenticated | Anonymous` once on mount; afterwards
//! login, register and logout move it between the two resolved states.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::domain::{Account, Credentials, NewAccount};
use crate::ports::{IdentityService, PortError, PortResult};

/// Why nobody is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousCause {
    /// Logged out, or never logged in during this session.
    SignedOut,
    /// The identity check was answered with an error status (usually 401).
    Rejected { status: u16 },
    /// The identity check never got an answer: transport, decoding or storage failure.
    Unreachable,
}

impl From<&PortError> for AnonymousCause {
    fn from(err: &PortError) -> Self {
        match err {
            PortError::Api { status, .. } => AnonymousCause::Rejected { status: *status },
            PortError::Storage(_) | PortError::Unexpected(_) => AnonymousCause::Unreachable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Authenticated(Account),
    Anonymous(AnonymousCause),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn user(&self) -> Option<&Account> {
        match self {
            SessionState::Authenticated(account) => Some(account),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session state read before the identity check finished")]
    Loading,
}

pub struct SessionContext {
    identity: Arc<dyn IdentityService>,
    state: watch::Sender<SessionState>,
}

impl SessionContext {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self { identity, state }
    }

    /// Runs the initial identity check. Only the first call does any work;
    /// later calls return the current state.
    pub async fn mount(&self) -> SessionState {
        if !self.state.borrow().is_loading() {
            return self.state();
        }

        let resolved = match self.identity.current_user().await {
            Ok(account) => {
                info!(user_id = %account.id, "session restored");
                SessionState::Authenticated(account)
            }
            Err(e) => {
                let cause = AnonymousCause::from(&e);
                debug!(?cause, "identity check failed: {}", e);
                SessionState::Anonymous(cause)
            }
        };

        // A login that finished while we were waiting wins.
        self.state.send_if_modified(|current| {
            if current.is_loading() {
                *current = resolved;
                true
            } else {
                false
            }
        });
        self.state()
    }

    /// Logs in, then re-reads the current user. On failure the state is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> PortResult<Account> {
        self.identity.login(&Credentials::new(email, password)).await?;
        let account = self.identity.current_user().await?;
        info!(user_id = %account.id, "session authenticated");
        self.state.send_replace(SessionState::Authenticated(account.clone()));
        Ok(account)
    }

    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> PortResult<Account> {
        let account = NewAccount {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        self.identity.register(&account).await?;
        self.login(email, password).await
    }

    /// Drops the token and signs out immediately. The state becomes anonymous
    /// even when clearing the stored token fails; that failure is still returned.
    pub fn logout(&self) -> PortResult<()> {
        let cleared = self.identity.logout();
        self.state
            .send_replace(SessionState::Anonymous(AnonymousCause::SignedOut));
        info!("session signed out");
        cleared
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The signed-in account. Fails while the initial identity check is pending.
    pub fn user(&self) -> Result<Option<Account>, SessionError> {
        match &*self.state.borrow() {
            SessionState::Loading => Err(SessionError::Loading),
            resolved => Ok(resolved.user().cloned()),
        }
    }

    /// Waits until the initial identity check has resolved.
    pub async fn ready(&self) -> SessionState {
        let mut updates = self.state.subscribe();
        let resolved = match updates.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        resolved
    }

    /// A receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
