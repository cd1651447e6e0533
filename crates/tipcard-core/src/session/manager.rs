//! Session lifecycle management.

use super::model::{ProfileSource, SessionSnapshot, SessionState};
use super::persistence::SessionKeys;
use crate::auth::{AuthProvider, PersistenceMode};
use crate::config::AppConfig;
use crate::error::{Result, TipcardError};
use crate::profile::{
    HOTELS_COLLECTION, OrganizationProfile, RegistrationInput, generate_org_id,
};
use crate::store::{RecordKey, RecordStore, SaveOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

/// Which path won a successful sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInMethod {
    /// The fixed demo credential pair.
    Demo,
    /// Remote authentication plus a confirmed remote profile.
    Remote,
    /// A locally cached profile matched the email.
    CachedProfile,
}

/// A completed registration.
///
/// Both variants mean the registration was accepted and the session is
/// onboarded; only `Synced` means the profile also reached the remote
/// store. Callers that need remote durability must check for `Synced`
/// rather than treating acceptance as a guarantee.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Synced(OrganizationProfile),
    CachedOnly(OrganizationProfile),
}

impl RegistrationOutcome {
    pub fn profile(&self) -> &OrganizationProfile {
        match self {
            Self::Synced(profile) | Self::CachedOnly(profile) => profile,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

/// Owns authentication and onboarding state.
///
/// `SessionManager` is responsible for:
/// - Resolving the initial state from the durable session flags
/// - The sign-in fallback ladder (demo, remote, local cache)
/// - Registration with offline fallback
/// - Sign-out (`reset_onboarding`)
/// - Following the auth provider's state stream
///
/// State changes are published to subscribers as [`SessionSnapshot`]s
/// through a watch channel; the UI re-renders from those.
pub struct SessionManager {
    auth: Arc<dyn AuthProvider>,
    records: Arc<RecordStore>,
    keys: SessionKeys,
    config: AppConfig,
    state: RwLock<SessionState>,
    state_tx: watch::Sender<SessionSnapshot>,
    watcher: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl SessionManager {
    /// Creates a manager and restores session state from the durable flags.
    ///
    /// A cached profile pre-empts `Loading`: the session starts
    /// authenticated and onboarded in offline mode, without any remote
    /// call. Otherwise the state stays `Loading` until the auth stream
    /// delivers its first event.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        records: Arc<RecordStore>,
        storage: Arc<dyn crate::store::KeyValueStorage>,
        config: AppConfig,
    ) -> Self {
        let keys = SessionKeys::new(storage);

        let initial = match keys.hotel_details() {
            Some(profile) => SessionState::AuthenticatedWithProfile {
                profile,
                source: ProfileSource::Cache,
            },
            None if keys.is_authenticated() => SessionState::AuthenticatedNoProfile,
            None => SessionState::Loading,
        };

        let (state_tx, _) = watch::channel(initial.snapshot());

        Self {
            auth,
            records,
            keys,
            config,
            state: RwLock::new(initial),
            state_tx,
            watcher: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Starts following the auth provider's state stream.
    ///
    /// Subscribes exactly once; a second call is a no-op. Each event either
    /// confirms a profile (remote fetch), degrades to offline mode, or
    /// clears the session. [`SessionManager::shutdown`] stops the stream;
    /// no transition is applied afterwards.
    pub async fn watch_auth_state(self: &Arc<Self>) {
        let mut slot = self.watcher.lock().await;
        if slot.is_some() {
            tracing::warn!("auth watcher already running");
            return;
        }

        let mut rx = self.auth.subscribe();
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                let identity = rx.borrow_and_update().clone();
                match weak.upgrade() {
                    Some(manager) => {
                        if manager.closed.load(Ordering::SeqCst) {
                            break;
                        }
                        manager.apply_auth_event(identity).await;
                    }
                    None => break,
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
        *slot = Some(handle);
    }

    /// Stops following the auth stream. Idempotent.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(handle) = self.watcher.lock().await.take() {
            handle.abort();
        }
    }

    /// Signs in, trying each credential source in order.
    ///
    /// The ladder: (a) the demo pair, resolved without touching the network
    /// or the cache; (b) remote authentication followed by a remote profile
    /// fetch; (c) a locally cached profile whose email matches. The first
    /// success wins and earlier failures are logged, not surfaced.
    ///
    /// # Errors
    ///
    /// [`TipcardError::InvalidCredentials`] when all three paths fail.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInMethod> {
        if email == self.config.demo.email && password == self.config.demo.password {
            let profile = OrganizationProfile::demo(&self.config.demo);
            self.enter_onboarded(profile, ProfileSource::Demo).await;
            return Ok(SignInMethod::Demo);
        }

        match self.remote_sign_in(email, password).await {
            Ok(profile) => {
                self.enter_onboarded(profile, ProfileSource::Remote).await;
                return Ok(SignInMethod::Remote);
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote sign-in failed, trying local cache");
            }
        }

        if let Some(profile) = self.cached_profile_for(email) {
            self.enter_onboarded(profile, ProfileSource::Cache).await;
            return Ok(SignInMethod::CachedProfile);
        }

        Err(TipcardError::InvalidCredentials)
    }

    /// Registers a new organization.
    ///
    /// Generates the organization id, attempts remote account creation and
    /// a remote profile write, and commits the profile to the local cache
    /// whatever the remote outcome. Remote failure is not an error: the
    /// session still becomes authenticated and onboarded, and the returned
    /// [`RegistrationOutcome`] records whether the profile reached the
    /// remote store.
    ///
    /// # Errors
    ///
    /// Only input validation fails; see [`RegistrationInput::validate`].
    pub async fn register(&self, input: RegistrationInput) -> Result<RegistrationOutcome> {
        input.validate()?;

        let org_id = generate_org_id();
        let mut profile = OrganizationProfile::from_registration(&input, org_id);

        let outcome = match self.create_remote_account(&input).await {
            Ok(identity) => {
                // Re-key the profile under the provider-assigned uid.
                profile.uid = identity.uid;
                let key = RecordKey::new(HOTELS_COLLECTION, &profile.uid)?;
                match self.records.save(&key, &profile).await? {
                    SaveOutcome::Synced => RegistrationOutcome::Synced(profile.clone()),
                    SaveOutcome::CachedOnly => RegistrationOutcome::CachedOnly(profile.clone()),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote registration failed, continuing in offline mode");
                let key = RecordKey::new(HOTELS_COLLECTION, &profile.uid)?;
                self.records.store_local(&key, &profile).await?;
                RegistrationOutcome::CachedOnly(profile.clone())
            }
        };

        let source = if outcome.is_synced() {
            ProfileSource::Remote
        } else {
            ProfileSource::Cache
        };
        self.enter_onboarded(profile, source).await;

        Ok(outcome)
    }

    /// Signs out and returns the session to `SignedOut`.
    ///
    /// Remote sign-out is attempted unless the session is in offline mode;
    /// its failure is logged and ignored. The durable session flags are
    /// cleared unconditionally. Cached record entries survive.
    pub async fn reset_onboarding(&self) {
        let offline = self.state.read().await.is_offline();
        if !offline {
            if let Err(err) = self.auth.sign_out().await {
                tracing::warn!(error = %err, "remote sign-out failed, clearing local session anyway");
            }
        }

        self.keys.clear();
        self.set_state(SessionState::SignedOut).await;
    }

    /// The current observer-facing snapshot.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    /// The active organization profile, if onboarded.
    pub async fn profile(&self) -> Option<OrganizationProfile> {
        self.state.read().await.profile().cloned()
    }

    /// Replaces the active profile after a catalog edit.
    ///
    /// Keeps the profile source unchanged and mirrors the new profile into
    /// the durable flags. Ignored when the session is not onboarded.
    pub async fn update_profile(&self, profile: OrganizationProfile) {
        let mut state = self.state.write().await;
        let SessionState::AuthenticatedWithProfile {
            profile: current, ..
        } = &mut *state
        else {
            tracing::warn!("profile update ignored: session is not onboarded");
            return;
        };
        *current = profile.clone();
        let snapshot = state.snapshot();
        drop(state);

        self.keys.set_hotel_details(Some(&profile));
        self.state_tx.send_replace(snapshot);
    }

    async fn apply_auth_event(&self, identity: Option<crate::auth::AuthIdentity>) {
        match identity {
            Some(identity) => {
                let key = match RecordKey::new(HOTELS_COLLECTION, &identity.uid) {
                    Ok(key) => key,
                    Err(err) => {
                        tracing::warn!(uid = %identity.uid, error = %err, "unusable auth identity");
                        return;
                    }
                };
                match self
                    .records
                    .fetch_remote::<OrganizationProfile>(&key)
                    .await
                {
                    Ok(Some(profile)) => {
                        self.enter_onboarded(profile, ProfileSource::Remote).await;
                    }
                    Ok(None) => {
                        tracing::info!(uid = %identity.uid, "identity has no stored profile, entering offline mode");
                        self.enter_offline().await;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "remote profile fetch failed, entering offline mode");
                        self.enter_offline().await;
                    }
                }
            }
            None => {
                // An offline session is cache-authoritative; the remote
                // stream reporting no identity must not end it.
                let state = self.state.read().await;
                let clears = matches!(
                    &*state,
                    SessionState::Loading
                        | SessionState::SignedOut
                        | SessionState::AuthenticatedWithProfile {
                            source: ProfileSource::Remote,
                            ..
                        }
                );
                drop(state);

                if clears {
                    self.keys.clear();
                    self.set_state(SessionState::SignedOut).await;
                } else {
                    tracing::debug!("ignoring remote sign-out for offline session");
                }
            }
        }
    }

    async fn remote_sign_in(&self, email: &str, password: &str) -> Result<OrganizationProfile> {
        self.auth.set_persistence(PersistenceMode::Durable).await?;
        let identity = self.auth.sign_in(email, password).await?;

        let key = RecordKey::new(HOTELS_COLLECTION, &identity.uid)?;
        match self
            .records
            .fetch_remote::<OrganizationProfile>(&key)
            .await?
        {
            Some(profile) => Ok(profile),
            None => Err(TipcardError::not_found(HOTELS_COLLECTION, identity.uid)),
        }
    }

    async fn create_remote_account(
        &self,
        input: &RegistrationInput,
    ) -> Result<crate::auth::AuthIdentity> {
        self.auth.set_persistence(PersistenceMode::Durable).await?;
        self.auth.create_account(&input.email, &input.password).await
    }

    fn cached_profile_for(&self, email: &str) -> Option<OrganizationProfile> {
        let profile = self.keys.hotel_details()?;
        if profile.email == email {
            Some(profile)
        } else {
            None
        }
    }

    async fn enter_onboarded(&self, profile: OrganizationProfile, source: ProfileSource) {
        self.keys.set_authenticated(true);
        self.keys.set_onboarding_complete(true);
        self.keys.set_hotel_details(Some(&profile));
        self.set_state(SessionState::AuthenticatedWithProfile { profile, source })
            .await;
    }

    async fn enter_offline(&self) {
        // The invariant for offline mode: onboarded is decided by cache
        // presence alone.
        if let Some(profile) = self.keys.hotel_details() {
            self.enter_onboarded(profile, ProfileSource::Cache).await;
        } else {
            self.set_state(SessionState::AuthenticatedNoProfile).await;
        }
    }

    async fn set_state(&self, next: SessionState) {
        let snapshot = next.snapshot();
        *self.state.write().await = next;
        self.state_tx.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthIdentity;
    use crate::store::{DocumentStore, KeyValueStorage};
    use serde_json::Value as JsonValue;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct FakeAuthProvider {
        accounts: StdMutex<HashMap<String, (String, String)>>,
        offline: AtomicBool,
        calls: AtomicUsize,
        tx: watch::Sender<Option<AuthIdentity>>,
    }

    impl FakeAuthProvider {
        fn new() -> Self {
            let (tx, _) = watch::channel(None);
            Self {
                accounts: StdMutex::new(HashMap::new()),
                offline: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
                tx,
            }
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn emit(&self, identity: Option<AuthIdentity>) {
            self.tx.send_replace(identity);
        }

        fn check_online(&self) -> Result<()> {
            if self.offline.load(Ordering::SeqCst) {
                Err(TipcardError::remote_unavailable("simulated outage"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl AuthProvider for FakeAuthProvider {
        async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.check_online()?;
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some((stored, uid)) if stored == password => {
                    let identity = AuthIdentity {
                        uid: uid.clone(),
                        email: email.to_string(),
                    };
                    self.tx.send_replace(Some(identity.clone()));
                    Ok(identity)
                }
                _ => Err(TipcardError::InvalidCredentials),
            }
        }

        async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.check_online()?;
            let mut accounts = self.accounts.lock().unwrap();
            let uid = format!("uid-{}", accounts.len() + 1);
            accounts.insert(email.to_string(), (password.to_string(), uid.clone()));
            let identity = AuthIdentity {
                uid,
                email: email.to_string(),
            };
            self.tx.send_replace(Some(identity.clone()));
            Ok(identity)
        }

        async fn sign_out(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.check_online()?;
            self.tx.send_replace(None);
            Ok(())
        }

        async fn set_persistence(&self, _mode: PersistenceMode) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.check_online()
        }

        fn subscribe(&self) -> watch::Receiver<Option<AuthIdentity>> {
            self.tx.subscribe()
        }
    }

    #[derive(Default)]
    struct FakeDocumentStore {
        documents: StdMutex<HashMap<String, JsonValue>>,
        offline: AtomicBool,
        reads: AtomicUsize,
    }

    impl FakeDocumentStore {
        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn check_online(&self) -> Result<()> {
            if self.offline.load(Ordering::SeqCst) {
                Err(TipcardError::remote_unavailable("simulated outage"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentStore for FakeDocumentStore {
        async fn get(&self, key: &RecordKey) -> Result<Option<JsonValue>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.check_online()?;
            Ok(self.documents.lock().unwrap().get(&key.encode()).cloned())
        }

        async fn set(&self, key: &RecordKey, value: &JsonValue, _merge: bool) -> Result<()> {
            self.check_online()?;
            self.documents
                .lock()
                .unwrap()
                .insert(key.encode(), value.clone());
            Ok(())
        }

        async fn enable_network(&self) -> Result<()> {
            self.check_online()
        }

        async fn disable_network(&self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeStorage {
        entries: StdMutex<HashMap<String, String>>,
    }

    impl KeyValueStorage for FakeStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    struct Harness {
        auth: Arc<FakeAuthProvider>,
        remote: Arc<FakeDocumentStore>,
        records: Arc<RecordStore>,
        manager: Arc<SessionManager>,
    }

    fn harness() -> Harness {
        harness_with_storage(Arc::new(FakeStorage::default()))
    }

    fn harness_with_storage(storage: Arc<FakeStorage>) -> Harness {
        let auth = Arc::new(FakeAuthProvider::new());
        let remote = Arc::new(FakeDocumentStore::default());
        let records = Arc::new(RecordStore::new(remote.clone(), storage.clone()));
        let manager = Arc::new(SessionManager::new(
            auth.clone(),
            records.clone(),
            storage,
            AppConfig::default(),
        ));
        Harness {
            auth,
            remote,
            records,
            manager,
        }
    }

    fn registration() -> RegistrationInput {
        RegistrationInput {
            hotel_name: "Acme Inn".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            phone: "+1 555 0100".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
        }
    }

    #[tokio::test]
    async fn test_demo_sign_in_is_fully_local() {
        let h = harness();

        let method = h.manager.sign_in("demo@hotel.com", "demo123").await.unwrap();

        assert_eq!(method, SignInMethod::Demo);
        assert_eq!(h.auth.calls(), 0);
        assert_eq!(h.remote.reads(), 0);

        let snapshot = h.manager.snapshot().await;
        assert!(snapshot.authenticated);
        assert!(snapshot.onboarded);
        assert!(!snapshot.offline_mode);
    }

    #[tokio::test]
    async fn test_remote_sign_in_confirms_profile() {
        let h = harness();
        let outcome = h.manager.register(registration()).await.unwrap();
        assert!(outcome.is_synced());
        h.manager.reset_onboarding().await;

        let method = h.manager.sign_in("a@b.com", "secret1").await.unwrap();

        assert_eq!(method, SignInMethod::Remote);
        let snapshot = h.manager.snapshot().await;
        assert!(snapshot.authenticated && snapshot.onboarded);
        assert!(!snapshot.offline_mode);
    }

    #[tokio::test]
    async fn test_sign_in_falls_back_to_cached_profile() {
        let h = harness();
        h.manager.register(registration()).await.unwrap();
        h.manager.reset_onboarding().await;

        h.auth.set_offline(true);
        h.remote.set_offline(true);

        // The sign-out left the flags cleared, so re-seed the cached profile
        // the way an interrupted session would have left it.
        let profile = OrganizationProfile::from_registration(&registration(), "HTL-TEST01".into());
        h.manager.keys.set_hotel_details(Some(&profile));

        let method = h.manager.sign_in("a@b.com", "secret1").await.unwrap();
        assert_eq!(method, SignInMethod::CachedProfile);

        let snapshot = h.manager.snapshot().await;
        assert!(snapshot.authenticated && snapshot.onboarded);
        assert!(snapshot.offline_mode);
    }

    #[tokio::test]
    async fn test_sign_in_exhausting_all_paths_fails() {
        let h = harness();
        h.auth.set_offline(true);
        h.remote.set_offline(true);

        let err = h.manager.sign_in("a@b.com", "secret1").await.unwrap_err();
        assert!(err.is_invalid_credentials());
        assert!(!h.manager.snapshot().await.authenticated);
    }

    #[tokio::test]
    async fn test_register_with_remote_up_syncs() {
        let h = harness();

        let outcome = h.manager.register(registration()).await.unwrap();

        assert!(outcome.is_synced());
        let profile = outcome.profile();
        assert_eq!(profile.uid, "uid-1");
        assert!(
            h.remote
                .documents
                .lock()
                .unwrap()
                .contains_key("hotels/uid-1")
        );
    }

    #[tokio::test]
    async fn test_register_with_remote_down_is_accepted_offline() {
        let h = harness();
        h.auth.set_offline(true);
        h.remote.set_offline(true);

        let outcome = h.manager.register(registration()).await.unwrap();

        assert!(!outcome.is_synced());
        let snapshot = h.manager.snapshot().await;
        assert!(snapshot.authenticated && snapshot.onboarded);
        assert!(snapshot.offline_mode);

        // org id shape: HTL- followed by six uppercase alphanumerics
        let org_id = &outcome.profile().org_id;
        assert!(org_id.starts_with("HTL-"));
        assert_eq!(org_id.len(), 10);
        assert!(
            org_id[4..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );

        // The profile is fetchable from the cache alone.
        let key = RecordKey::new(HOTELS_COLLECTION, &outcome.profile().uid).unwrap();
        let fetched: OrganizationProfile = h.records.fetch(&key).await.unwrap();
        assert_eq!(&fetched, outcome.profile());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let h = harness();
        let mut input = registration();
        input.confirm_password = "different".to_string();

        let err = h.manager.register(input).await.unwrap_err();
        assert!(matches!(err, TipcardError::InvalidInput(_)));
        assert!(!h.manager.snapshot().await.authenticated);
    }

    #[tokio::test]
    async fn test_reset_onboarding_clears_flags_not_records() {
        let h = harness();
        let outcome = h.manager.register(registration()).await.unwrap();
        let key = RecordKey::new(HOTELS_COLLECTION, &outcome.profile().uid).unwrap();

        h.manager.reset_onboarding().await;

        let snapshot = h.manager.snapshot().await;
        assert!(!snapshot.authenticated);
        assert!(!snapshot.onboarded);

        // Cached record data survives sign-out.
        h.remote.set_offline(true);
        let fetched: Option<OrganizationProfile> = h.records.fetch(&key).await;
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_reset_onboarding_skips_remote_sign_out_when_offline() {
        let h = harness();
        h.auth.set_offline(true);
        h.remote.set_offline(true);
        h.manager.register(registration()).await.unwrap();

        let calls_before = h.auth.calls();
        h.manager.reset_onboarding().await;
        assert_eq!(h.auth.calls(), calls_before);
    }

    #[tokio::test]
    async fn test_startup_restores_cached_session() {
        let storage = Arc::new(FakeStorage::default());
        let h = harness_with_storage(storage.clone());
        h.auth.set_offline(true);
        h.remote.set_offline(true);
        h.manager.register(registration()).await.unwrap();

        // A new process over the same storage.
        let restarted = harness_with_storage(storage);
        restarted.auth.set_offline(true);
        restarted.remote.set_offline(true);

        let snapshot = restarted.manager.snapshot().await;
        assert!(snapshot.authenticated && snapshot.onboarded);
        assert!(snapshot.offline_mode);
        assert_eq!(restarted.remote.reads(), 0);
    }

    #[tokio::test]
    async fn test_auth_watcher_confirms_remote_profile() {
        let h = harness();
        let outcome = h.manager.register(registration()).await.unwrap();
        h.manager.reset_onboarding().await;

        h.manager.watch_auth_state().await;
        let mut snapshots = h.manager.subscribe();

        h.auth.emit(Some(AuthIdentity {
            uid: outcome.profile().uid.clone(),
            email: "a@b.com".to_string(),
        }));

        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if snapshots.borrow_and_update().onboarded {
                    break;
                }
                snapshots.changed().await.unwrap();
            }
        })
        .await
        .expect("watcher should confirm the profile");

        assert!(!h.manager.snapshot().await.offline_mode);
        h.manager.shutdown().await;
    }

    #[tokio::test]
    async fn test_auth_watcher_stops_after_shutdown() {
        let h = harness();
        h.manager.watch_auth_state().await;
        h.manager.shutdown().await;

        h.auth.emit(Some(AuthIdentity {
            uid: "uid-9".to_string(),
            email: "x@y.com".to_string(),
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!h.manager.snapshot().await.authenticated);
    }
}
