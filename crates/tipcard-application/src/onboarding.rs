//! Onboarding use case.
//!
//! The UI-facing wrapper around [`SessionManager`]: forwards the session
//! operations and turns sign-out into a navigation signal so the shell can
//! route back to the sign-in screen.

use std::sync::Arc;
use tipcard_core::error::Result;
use tipcard_core::profile::{OrganizationProfile, RegistrationInput};
use tipcard_core::session::{
    RegistrationOutcome, SessionManager, SessionSnapshot, SignInMethod,
};
use tokio::sync::{RwLock, watch};

/// Where the shell should navigate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
}

/// Callback invoked when a session operation demands navigation.
pub type NavigationCallback = Arc<dyn Fn(Route) + Send + Sync>;

/// Drives the onboarding screens.
pub struct OnboardingUseCase {
    manager: Arc<SessionManager>,
    navigation: RwLock<Option<NavigationCallback>>,
}

impl OnboardingUseCase {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self {
            manager,
            navigation: RwLock::new(None),
        }
    }

    /// Registers the navigation callback (e.g. the router's `push`).
    pub async fn set_navigation_callback(&self, callback: NavigationCallback) {
        *self.navigation.write().await = Some(callback);
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInMethod> {
        self.manager.sign_in(email, password).await
    }

    pub async fn register(&self, input: RegistrationInput) -> Result<RegistrationOutcome> {
        self.manager.register(input).await
    }

    /// Signs out and sends the shell back to the sign-in entry point.
    pub async fn reset_onboarding(&self) {
        self.manager.reset_onboarding().await;

        if let Some(callback) = self.navigation.read().await.as_ref() {
            callback(Route::SignIn);
        } else {
            tracing::debug!("no navigation callback registered after sign-out");
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.manager.snapshot().await
    }

    /// Stream of session snapshots for the shell to re-render from.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.manager.subscribe()
    }

    pub async fn profile(&self) -> Option<OrganizationProfile> {
        self.manager.profile().await
    }
}
