//! Auth session ports
//!
//! Token refresh and storage are external collaborators; the sync layer only
//! needs two things from them: the current bearer token (re-read at every
//! connect and request, never cached) and the current user's id for
//! optimistic reaction toggles.

use parking_lot::RwLock;

use pulse_core::EntityId;

/// Source of the current bearer token
pub trait TokenStore: Send + Sync {
    /// The token to present right now, or `None` when logged out.
    ///
    /// Implementations must return the latest stored value on every call so
    /// a post-login reconnect authenticates with the fresh token.
    fn bearer_token(&self) -> Option<String>;
}

/// Source of the current user identity
pub trait Identity: Send + Sync {
    /// The logged-in user's id, or `None` when logged out
    fn current_user(&self) -> Option<EntityId>;
}

/// In-memory auth session implementing both ports
///
/// Real applications adapt their token manager to the two traits; this
/// implementation backs tests and single-process embedders.
#[derive(Debug, Default)]
pub struct MemoryAuthSession {
    token: RwLock<Option<String>>,
    user: RwLock<Option<EntityId>>,
}

impl MemoryAuthSession {
    /// Create a logged-out session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logged-in session
    pub fn logged_in(user_id: impl Into<EntityId>, token: impl Into<String>) -> Self {
        let session = Self::new();
        session.login(user_id, token);
        session
    }

    /// Record a login (or a token refresh for the same user)
    pub fn login(&self, user_id: impl Into<EntityId>, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
        *self.user.write() = Some(user_id.into());
    }

    /// Replace only the token (refresh without identity change)
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Clear the session
    pub fn logout(&self) {
        *self.token.write() = None;
        *self.user.write() = None;
    }

    /// Check if a user is logged in
    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some()
    }
}

impl TokenStore for MemoryAuthSession {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

impl Identity for MemoryAuthSession {
    fn current_user(&self) -> Option<EntityId> {
        self.user.read().clone()
    }
}
