//! Auth provider trait.
//!
//! Defines the interface the session manager consumes for authentication,
//! decoupling it from the concrete backend SDK. The provider publishes auth
//! state changes through a `tokio::sync::watch` channel: the receiver's
//! current value is the present identity (or `None`), and every subsequent
//! change is observed by awaiting `changed()`.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The authenticated identity reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Provider-assigned user identifier; also the organization profile's
    /// document id.
    pub uid: String,
    pub email: String,
}

/// How long the provider keeps the authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    /// Identity survives process restarts.
    Durable,
    /// Identity is forgotten when the process exits.
    SessionOnly,
}

/// An abstract authentication backend.
///
/// Implementations are expected to be remote services; every method other
/// than [`AuthProvider::subscribe`] may fail with
/// [`crate::TipcardError::RemoteUnavailable`], which callers degrade per the
/// error policy table.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticates an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity>;

    /// Creates a new account and signs it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity>;

    /// Ends the remote session.
    async fn sign_out(&self) -> Result<()>;

    /// Sets how long the provider persists the identity.
    async fn set_persistence(&self, mode: PersistenceMode) -> Result<()>;

    /// Subscribes to auth state changes. The receiver's current value is the
    /// identity at subscription time.
    fn subscribe(&self) -> watch::Receiver<Option<AuthIdentity>>;
}
