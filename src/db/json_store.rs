//! File-backed document store.
//!
//! One JSON document on disk holds every user's section (`entries` +
//! `profile`). Writes rewrite the file and publish a fresh snapshot to that
//! user's watch channel, so live subscriptions behave like the hosted
//! store's.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use weightlog_core::models::{ProfilePatch, UserProfile, WeightEntry};
use weightlog_core::sync::{DocumentStore, RemoteError, Snapshot};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserDoc {
    entries: Vec<WeightEntry>,
    profile: UserProfile,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    users: HashMap<String, UserDoc>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    data: StoreData,
    watchers: HashMap<String, watch::Sender<Snapshot>>,
}

impl Inner {
    fn save(&self) -> Result<(), RemoteError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RemoteError::Write(format!("{}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| RemoteError::Write(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| RemoteError::Write(format!("{}: {}", self.path.display(), e)))
    }

    fn publish(&self, user: &str) {
        let entries = self
            .data
            .users
            .get(user)
            .map(|doc| doc.entries.clone())
            .unwrap_or_default();
        if let Some(tx) = self.watchers.get(user) {
            tx.send_replace(entries);
        }
    }

    /// Copy of the user's section, for staging a mutation.
    fn doc_snapshot(&self, user: &str) -> UserDoc {
        self.data.users.get(user).cloned().unwrap_or_default()
    }

    /// Installs a staged user section, writes the file, and publishes.
    ///
    /// A failed write rolls the section back, so in-memory state never gets
    /// ahead of the file: reads report only what was actually persisted.
    fn commit(&mut self, user: &str, doc: UserDoc) -> Result<(), RemoteError> {
        let previous = self.data.users.insert(user.to_string(), doc);
        if let Err(e) = self.save() {
            match previous {
                Some(doc) => {
                    self.data.users.insert(user.to_string(), doc);
                }
                None => {
                    self.data.users.remove(user);
                }
            }
            return Err(e);
        }
        self.publish(user);
        Ok(())
    }
}

/// JSON-file `DocumentStore` implementation.
#[derive(Debug)]
pub struct JsonStore {
    inner: Mutex<Inner>,
}

impl JsonStore {
    /// Opens the store, reading the data file if it exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RemoteError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| RemoteError::Unavailable(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| RemoteError::Unavailable(format!("{}: {}", path.display(), e)))?
        } else {
            StoreData::default()
        };
        tracing::debug!(path = %path.display(), "opened data store");

        Ok(Self {
            inner: Mutex::new(Inner {
                path,
                data,
                watchers: HashMap::new(),
            }),
        })
    }
}

#[async_trait]
impl DocumentStore for JsonStore {
    async fn create_entry(
        &self,
        user: &str,
        entry: &WeightEntry,
    ) -> Result<WeightEntry, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        let created = entry.clone().with_id(Uuid::new_v4());
        let mut doc = inner.doc_snapshot(user);
        doc.entries.push(created.clone());
        inner.commit(user, doc)?;
        Ok(created)
    }

    async fn update_entry(
        &self,
        user: &str,
        id: Uuid,
        entry: &WeightEntry,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        let mut doc = inner.doc_snapshot(user);
        let existing = doc
            .entries
            .iter_mut()
            .find(|e| e.id == Some(id))
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        existing.date = entry.date;
        existing.weight = entry.weight;
        existing.notes = entry.notes.clone();
        inner.commit(user, doc)
    }

    async fn delete_entry(&self, user: &str, id: Uuid) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        let mut doc = inner.doc_snapshot(user);
        let index = doc
            .entries
            .iter()
            .position(|e| e.id == Some(id))
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        doc.entries.remove(index);
        inner.commit(user, doc)
    }

    async fn entry_by_date(
        &self,
        user: &str,
        date: NaiveDate,
    ) -> Result<Option<WeightEntry>, RemoteError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .data
            .users
            .get(user)
            .and_then(|doc| doc.entries.iter().find(|e| e.date == date))
            .cloned())
    }

    async fn watch_entries(&self, user: &str) -> Result<watch::Receiver<Snapshot>, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        let entries = inner
            .data
            .users
            .get(user)
            .map(|doc| doc.entries.clone())
            .unwrap_or_default();
        let tx = inner
            .watchers
            .entry(user.to_string())
            .or_insert_with(|| watch::channel(Vec::new()).0);
        tx.send_replace(entries);
        Ok(tx.subscribe())
    }

    async fn load_profile(&self, user: &str) -> Result<UserProfile, RemoteError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .data
            .users
            .get(user)
            .map(|doc| doc.profile.clone())
            .unwrap_or_default())
    }

    async fn merge_profile(&self, user: &str, patch: &ProfilePatch) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        let mut doc = inner.doc_snapshot(user);
        doc.profile.merge(patch);
        inner.commit(user, doc)
    }
}
