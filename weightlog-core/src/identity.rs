//! Identity collaborator.
//!
//! The core only ever consumes an opaque user id to scope queries;
//! credentials are interpreted by whatever hosts the identity service.
//! `LocalIdentity` is the shipped implementation: it keeps the signed-in
//! user in a watch channel so consumers can react to sign-in/out
//! transitions.

use tokio::sync::watch;

/// Opaque user identifier.
pub type UserId = String;

/// Read access to the current authentication state.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when signed out.
    fn current_user(&self) -> Option<UserId>;

    /// A change notification fired on every auth state transition.
    fn subscribe(&self) -> watch::Receiver<Option<UserId>>;
}

/// Process-local identity state.
#[derive(Debug)]
pub struct LocalIdentity {
    tx: watch::Sender<Option<UserId>>,
}

impl LocalIdentity {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Signs a user in, notifying subscribers.
    pub fn sign_in(&self, user: impl Into<UserId>) {
        self.tx.send_replace(Some(user.into()));
    }

    /// Signs the current user out, notifying subscribers.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.tx.subscribe()
    }
}
