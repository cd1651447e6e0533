//! Durable session flags.
//!
//! The session manager mirrors its state into three well-known keys of the
//! durable key-value store so a later process start can restore the session
//! without a remote call. The key names are the persisted-data contract of
//! existing deployments and must not change.

use crate::profile::OrganizationProfile;
use crate::store::KeyValueStorage;
use std::sync::Arc;

pub(crate) const KEY_IS_AUTHENTICATED: &str = "isAuthenticated";
pub(crate) const KEY_ONBOARDING_COMPLETE: &str = "onboardingComplete";
pub(crate) const KEY_HOTEL_DETAILS: &str = "hotelDetails";

/// Typed accessors over the session's durable flags.
///
/// Write failures are logged and swallowed: the in-memory session state is
/// authoritative for the running process, the flags only matter to the next
/// one.
pub struct SessionKeys {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionKeys {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_bool(KEY_IS_AUTHENTICATED)
    }

    pub fn onboarding_complete(&self) -> bool {
        self.read_bool(KEY_ONBOARDING_COMPLETE)
    }

    pub fn hotel_details(&self) -> Option<OrganizationProfile> {
        let raw = match self.storage.get(KEY_HOTEL_DETAILS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read cached profile");
                return None;
            }
        };

        match serde_json::from_str::<Option<OrganizationProfile>>(&raw) {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable cached profile");
                None
            }
        }
    }

    pub fn set_authenticated(&self, value: bool) {
        self.write(KEY_IS_AUTHENTICATED, if value { "true" } else { "false" });
    }

    pub fn set_onboarding_complete(&self, value: bool) {
        self.write(KEY_ONBOARDING_COMPLETE, if value { "true" } else { "false" });
    }

    pub fn set_hotel_details(&self, profile: Option<&OrganizationProfile>) {
        match serde_json::to_string(&profile) {
            Ok(raw) => self.write(KEY_HOTEL_DETAILS, &raw),
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize profile for caching");
            }
        }
    }

    /// Clears the three session flags. Cached record entries under other
    /// keys are untouched: signing out ends the session, it does not forget
    /// offline data.
    pub fn clear(&self) {
        self.set_authenticated(false);
        self.set_onboarding_complete(false);
        self.write(KEY_HOTEL_DETAILS, "null");
    }

    fn read_bool(&self, key: &str) -> bool {
        match self.storage.get(key) {
            Ok(Some(raw)) => raw == "true",
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read session flag");
                false
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            tracing::warn!(key, error = %err, "session flag write failed");
        }
    }
}
