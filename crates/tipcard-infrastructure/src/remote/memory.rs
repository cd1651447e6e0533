//! In-process auth and document backends.
//!
//! These implement the remote collaborator traits entirely in memory, with
//! an `offline` switch that makes every call fail the way an unreachable
//! backend would. Integration tests drive the offline scenarios with them,
//! and local development runs against them when no real backend is
//! configured.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tipcard_core::auth::{AuthIdentity, AuthProvider, PersistenceMode};
use tipcard_core::error::{Result, TipcardError};
use tipcard_core::store::{DocumentStore, RecordKey};
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

/// An [`AuthProvider`] holding accounts in memory.
pub struct MemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    offline: AtomicBool,
    calls: AtomicUsize,
    state_tx: watch::Sender<Option<AuthIdentity>>,
}

struct Account {
    password: String,
    uid: String,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            state_tx,
        }
    }

    /// Makes every subsequent call fail with `RemoteUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of calls received, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Publishes an auth state change, as an external session expiry would.
    pub fn emit(&self, identity: Option<AuthIdentity>) {
        self.state_tx.send_replace(identity);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(TipcardError::remote_unavailable("auth provider unreachable"))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let accounts = self.accounts.read().await;
        match accounts.get(email) {
            Some(account) if account.password == password => {
                let identity = AuthIdentity {
                    uid: account.uid.clone(),
                    email: email.to_string(),
                };
                self.state_tx.send_replace(Some(identity.clone()));
                Ok(identity)
            }
            _ => Err(TipcardError::InvalidCredentials),
        }
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(TipcardError::invalid_input("account already exists"));
        }

        let uid = Uuid::new_v4().to_string();
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                uid: uid.clone(),
            },
        );

        let identity = AuthIdentity {
            uid,
            email: email.to_string(),
        };
        self.state_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.state_tx.send_replace(None);
        Ok(())
    }

    async fn set_persistence(&self, _mode: PersistenceMode) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthIdentity>> {
        self.state_tx.subscribe()
    }
}

/// A [`DocumentStore`] holding documents in memory.
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, JsonValue>>,
    offline: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent call fail with `RemoteUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Direct document access for assertions.
    pub async fn document(&self, key: &RecordKey) -> Option<JsonValue> {
        self.documents.read().await.get(&key.encode()).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(TipcardError::remote_unavailable("document store unreachable"))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &RecordKey) -> Result<Option<JsonValue>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.documents.read().await.get(&key.encode()).cloned())
    }

    async fn set(&self, key: &RecordKey, value: &JsonValue, merge: bool) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let mut documents = self.documents.write().await;
        match documents.get_mut(&key.encode()) {
            Some(existing) if merge => deep_merge(existing, value),
            _ => {
                documents.insert(key.encode(), value.clone());
            }
        }
        Ok(())
    }

    async fn enable_network(&self) -> Result<()> {
        self.check_online()
    }

    async fn disable_network(&self) -> Result<()> {
        Ok(())
    }
}

/// Merge semantics of the remote store: object fields are merged
/// recursively, everything else is replaced.
fn deep_merge(target: &mut JsonValue, incoming: &JsonValue) {
    if let (JsonValue::Object(existing), JsonValue::Object(update)) = (&mut *target, incoming) {
        for (field, value) in update {
            match existing.get_mut(field) {
                Some(slot) => deep_merge(slot, value),
                None => {
                    existing.insert(field.clone(), value.clone());
                }
            }
        }
    } else {
        *target = incoming.clone();
    }
}
