//! In-memory document store.
//!
//! Backs tests and offline experimentation. Behaves like the hosted store:
//! per-user collections, store-assigned ids, merge-updates, and a live
//! snapshot channel per user. An offline toggle simulates an unreachable
//! store for failure-path tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::watch;
use uuid::Uuid;

use super::error::RemoteError;
use super::remote::{DocumentStore, Snapshot};
use crate::models::{ProfilePatch, UserProfile, WeightEntry};

#[derive(Debug)]
struct UserDocs {
    entries: Vec<WeightEntry>,
    profile: UserProfile,
    notify: watch::Sender<Snapshot>,
}

impl UserDocs {
    fn new() -> Self {
        let (notify, _) = watch::channel(Vec::new());
        Self {
            entries: Vec::new(),
            profile: UserProfile::default(),
            notify,
        }
    }

    fn publish(&self) {
        self.notify.send_replace(self.entries.clone());
    }
}

/// In-memory `DocumentStore` implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, UserDocs>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When offline, every operation fails with `RemoteError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored entry records for a user.
    pub fn entry_count(&self, user: &str) -> usize {
        self.users
            .lock()
            .unwrap()
            .get(user)
            .map_or(0, |docs| docs.entries.len())
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("store is offline".into()))
        } else {
            Ok(())
        }
    }

    fn with_user<R>(&self, user: &str, f: impl FnOnce(&mut UserDocs) -> R) -> R {
        let mut users = self.users.lock().unwrap();
        let docs = users.entry(user.to_string()).or_insert_with(UserDocs::new);
        f(docs)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_entry(
        &self,
        user: &str,
        entry: &WeightEntry,
    ) -> Result<WeightEntry, RemoteError> {
        self.check_online()?;
        let created = entry.clone().with_id(Uuid::new_v4());
        self.with_user(user, |docs| {
            docs.entries.push(created.clone());
            docs.publish();
        });
        Ok(created)
    }

    async fn update_entry(
        &self,
        user: &str,
        id: Uuid,
        entry: &WeightEntry,
    ) -> Result<(), RemoteError> {
        self.check_online()?;
        self.with_user(user, |docs| {
            match docs.entries.iter_mut().find(|e| e.id == Some(id)) {
                Some(existing) => {
                    existing.date = entry.date;
                    existing.weight = entry.weight;
                    existing.notes = entry.notes.clone();
                    docs.publish();
                    Ok(())
                }
                None => Err(RemoteError::NotFound(id.to_string())),
            }
        })
    }

    async fn delete_entry(&self, user: &str, id: Uuid) -> Result<(), RemoteError> {
        self.check_online()?;
        self.with_user(user, |docs| {
            match docs.entries.iter().position(|e| e.id == Some(id)) {
                Some(index) => {
                    docs.entries.remove(index);
                    docs.publish();
                    Ok(())
                }
                None => Err(RemoteError::NotFound(id.to_string())),
            }
        })
    }

    async fn entry_by_date(
        &self,
        user: &str,
        date: NaiveDate,
    ) -> Result<Option<WeightEntry>, RemoteError> {
        self.check_online()?;
        Ok(self.with_user(user, |docs| {
            docs.entries.iter().find(|e| e.date == date).cloned()
        }))
    }

    async fn watch_entries(&self, user: &str) -> Result<watch::Receiver<Snapshot>, RemoteError> {
        self.check_online()?;
        Ok(self.with_user(user, |docs| {
            docs.publish();
            docs.notify.subscribe()
        }))
    }

    async fn load_profile(&self, user: &str) -> Result<UserProfile, RemoteError> {
        self.check_online()?;
        Ok(self.with_user(user, |docs| docs.profile.clone()))
    }

    async fn merge_profile(&self, user: &str, patch: &ProfilePatch) -> Result<(), RemoteError> {
        self.check_online()?;
        self.with_user(user, |docs| docs.profile.merge(patch));
        Ok(())
    }
}
