//! Session state machine model.

use crate::profile::OrganizationProfile;
use serde::{Deserialize, Serialize};

/// How the active profile was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    /// Confirmed by a successful remote fetch or write.
    Remote,
    /// Served from the local cache; the remote store never confirmed it.
    Cache,
    /// The fixed demo profile.
    Demo,
}

/// The session state machine.
///
/// `Loading` is the initial state; it resolves when the auth provider's
/// state stream delivers its first event, unless a cached profile pre-empts
/// it at startup. The authenticated states are split by whether an
/// organization profile is present, so "authenticated but not onboarded"
/// and "onboarded" cannot be confused by independent boolean flags.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for the first auth event.
    Loading,
    SignedOut,
    /// An identity exists but no profile could be confirmed; the session is
    /// in offline mode until a profile arrives.
    AuthenticatedNoProfile,
    AuthenticatedWithProfile {
        profile: OrganizationProfile,
        source: ProfileSource,
    },
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            Self::AuthenticatedNoProfile | Self::AuthenticatedWithProfile { .. }
        )
    }

    /// Onboarded means an organization profile is attached.
    pub fn is_onboarded(&self) -> bool {
        matches!(self, Self::AuthenticatedWithProfile { .. })
    }

    /// Offline mode: the identity was established without a successful
    /// remote profile confirmation. Demo sessions are not offline - they
    /// never involve the remote store at all.
    pub fn is_offline(&self) -> bool {
        match self {
            Self::AuthenticatedNoProfile => true,
            Self::AuthenticatedWithProfile { source, .. } => *source == ProfileSource::Cache,
            Self::Loading | Self::SignedOut => false,
        }
    }

    pub fn profile(&self) -> Option<&OrganizationProfile> {
        match self {
            Self::AuthenticatedWithProfile { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// The flattened view published to subscribers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            loading: self.is_loading(),
            authenticated: self.is_authenticated(),
            onboarded: self.is_onboarded(),
            offline_mode: self.is_offline(),
        }
    }
}

/// Observer-facing summary of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub authenticated: bool,
    pub onboarded: bool,
    pub offline_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoCredentials;

    fn profile() -> OrganizationProfile {
        OrganizationProfile::demo(&DemoCredentials::default())
    }

    #[test]
    fn test_loading_snapshot() {
        let snapshot = SessionState::Loading.snapshot();
        assert!(snapshot.loading);
        assert!(!snapshot.authenticated);
        assert!(!snapshot.onboarded);
        assert!(!snapshot.offline_mode);
    }

    #[test]
    fn test_no_profile_is_offline_and_not_onboarded() {
        let state = SessionState::AuthenticatedNoProfile;
        assert!(state.is_authenticated());
        assert!(!state.is_onboarded());
        assert!(state.is_offline());
    }

    #[test]
    fn test_cached_profile_is_offline_mode() {
        let state = SessionState::AuthenticatedWithProfile {
            profile: profile(),
            source: ProfileSource::Cache,
        };
        assert!(state.is_authenticated());
        assert!(state.is_onboarded());
        assert!(state.is_offline());
    }

    #[test]
    fn test_remote_profile_is_not_offline_mode() {
        let state = SessionState::AuthenticatedWithProfile {
            profile: profile(),
            source: ProfileSource::Remote,
        };
        assert!(!state.is_offline());
    }

    #[test]
    fn test_demo_profile_is_not_offline_mode() {
        let state = SessionState::AuthenticatedWithProfile {
            profile: profile(),
            source: ProfileSource::Demo,
        };
        assert!(state.is_onboarded());
        assert!(!state.is_offline());
    }
}
