//! Remote sync adapter.
//!
//! Bridges the in-memory entry store to an external document store with
//! change notification. Writes go out through `persist_upsert` /
//! `persist_delete`; reads come back as full snapshots delivered to the
//! subscription callback.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use super::error::RemoteError;
use crate::identity::UserId;
use crate::models::{ProfilePatch, UserProfile, WeightEntry};

/// A full, self-consistent set of one user's entries.
pub type Snapshot = Vec<WeightEntry>;

/// The external document store collaborator.
///
/// Records are keyed per user; the store assigns entry ids on creation and
/// provides a live snapshot subscription per user collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates an entry record and returns it with its assigned id.
    async fn create_entry(
        &self,
        user: &str,
        entry: &WeightEntry,
    ) -> Result<WeightEntry, RemoteError>;

    /// Merge-updates the record with the given id. Fields carried by
    /// `entry` overwrite; anything else on the record is left alone.
    async fn update_entry(&self, user: &str, id: Uuid, entry: &WeightEntry)
        -> Result<(), RemoteError>;

    /// Deletes the record with the given id.
    async fn delete_entry(&self, user: &str, id: Uuid) -> Result<(), RemoteError>;

    /// One-shot query: the user's entry for a date, if one exists.
    async fn entry_by_date(
        &self,
        user: &str,
        date: NaiveDate,
    ) -> Result<Option<WeightEntry>, RemoteError>;

    /// Opens a live subscription to the user's entry collection. The
    /// receiver holds the current snapshot and is updated on every change;
    /// dropping it ends the subscription.
    async fn watch_entries(&self, user: &str) -> Result<watch::Receiver<Snapshot>, RemoteError>;

    /// Loads the user's profile; a missing profile reads as defaults.
    async fn load_profile(&self, user: &str) -> Result<UserProfile, RemoteError>;

    /// Merge-updates the user's profile.
    async fn merge_profile(&self, user: &str, patch: &ProfilePatch) -> Result<(), RemoteError>;
}

/// Subscription state: either idle, or live for exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionState {
    Unsubscribed,
    SubscribedFor(UserId),
}

/// Adapter between the entry store and a `DocumentStore`.
///
/// Owns at most one live subscription; `resubscribe` tears down the previous
/// one before opening the next, so a stale user's snapshots can never reach
/// the callback after a user change.
pub struct RemoteSync<S: DocumentStore> {
    store: Arc<S>,
    state: SubscriptionState,
    forward_task: Option<JoinHandle<()>>,
}

impl<S: DocumentStore + 'static> RemoteSync<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: SubscriptionState::Unsubscribed,
            forward_task: None,
        }
    }

    pub fn state(&self) -> &SubscriptionState {
        &self.state
    }

    /// Tears down any existing subscription and opens one for `user`.
    ///
    /// The initial snapshot is delivered to `on_snapshot` before this call
    /// returns; later snapshots arrive from a background forwarding task.
    pub async fn resubscribe<F>(&mut self, user: &str, mut on_snapshot: F) -> Result<(), RemoteError>
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        self.unsubscribe();

        let mut rx = self.store.watch_entries(user).await?;
        on_snapshot(rx.borrow_and_update().clone());

        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                on_snapshot(snapshot);
            }
        });

        self.forward_task = Some(task);
        self.state = SubscriptionState::SubscribedFor(user.to_string());
        Ok(())
    }

    /// Ends the live subscription, if any.
    pub fn unsubscribe(&mut self) {
        if let Some(task) = self.forward_task.take() {
            task.abort();
        }
        self.state = SubscriptionState::Unsubscribed;
    }

    /// Persists an upserted entry and returns it as acknowledged.
    ///
    /// An entry without an id is first looked up by date, so two clients
    /// racing on the same date update one record instead of creating a
    /// remote duplicate.
    pub async fn persist_upsert(
        &self,
        user: &str,
        entry: &WeightEntry,
    ) -> Result<WeightEntry, RemoteError> {
        match entry.id {
            Some(id) => {
                self.store.update_entry(user, id, entry).await?;
                Ok(entry.clone())
            }
            None => match self.store.entry_by_date(user, entry.date).await? {
                Some(existing) => {
                    let id = existing
                        .id
                        .ok_or_else(|| RemoteError::Query("remote record without id".into()))?;
                    self.store.update_entry(user, id, entry).await?;
                    Ok(entry.clone().with_id(id))
                }
                None => self.store.create_entry(user, entry).await,
            },
        }
    }

    /// Deletes the remote record by id.
    ///
    /// A remote `NotFound` means another client already deleted it; that is
    /// logged and treated as success.
    pub async fn persist_delete(&self, user: &str, id: Uuid) -> Result<(), RemoteError> {
        match self.store.delete_entry(user, id).await {
            Ok(()) => Ok(()),
            Err(RemoteError::NotFound(_)) => {
                warn!(%id, "delete of already-removed entry, ignoring");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn load_profile(&self, user: &str) -> Result<UserProfile, RemoteError> {
        self.store.load_profile(user).await
    }

    pub async fn merge_profile(
        &self,
        user: &str,
        patch: &ProfilePatch,
    ) -> Result<(), RemoteError> {
        self.store.merge_profile(user, patch).await
    }
}

impl<S: DocumentStore> Drop for RemoteSync<S> {
    fn drop(&mut self) {
        if let Some(task) = self.forward_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::memory::MemoryStore;
    use std::sync::Mutex;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_persist_upsert_creates_and_assigns_id() {
        let store = Arc::new(MemoryStore::new());
        let sync = RemoteSync::new(store.clone());

        let entry = WeightEntry::new(date("2024-01-01"), 182.0).with_notes("start");
        let acked = sync.persist_upsert("alice", &entry).await.unwrap();

        assert!(acked.id.is_some());
        let found = store
            .entry_by_date("alice", date("2024-01-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, acked.id);
        assert_eq!(found.weight, 182.0);
    }

    #[tokio::test]
    async fn test_persist_upsert_without_id_updates_existing_date() {
        // A second client already created a record for the date; our id-less
        // upsert must update it rather than duplicate it.
        let store = Arc::new(MemoryStore::new());
        let sync = RemoteSync::new(store.clone());

        let first = sync
            .persist_upsert("alice", &WeightEntry::new(date("2024-01-01"), 182.0))
            .await
            .unwrap();

        let second = sync
            .persist_upsert("alice", &WeightEntry::new(date("2024-01-01"), 181.0))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.entry_count("alice"), 1);
        let found = store
            .entry_by_date("alice", date("2024-01-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.weight, 181.0);
    }

    #[tokio::test]
    async fn test_persist_upsert_with_id_updates_directly() {
        let store = Arc::new(MemoryStore::new());
        let sync = RemoteSync::new(store.clone());

        let acked = sync
            .persist_upsert("alice", &WeightEntry::new(date("2024-01-01"), 182.0))
            .await
            .unwrap();

        let edited = acked.clone().with_notes("edited");
        sync.persist_upsert("alice", &edited).await.unwrap();

        let found = store
            .entry_by_date("alice", date("2024-01-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.notes, "edited");
    }

    #[tokio::test]
    async fn test_persist_delete_missing_id_is_ok() {
        let store = Arc::new(MemoryStore::new());
        let sync = RemoteSync::new(store);

        let result = sync.persist_delete("alice", Uuid::new_v4()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_resubscribe_delivers_initial_snapshot() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_entry("alice", &WeightEntry::new(date("2024-01-01"), 182.0))
            .await
            .unwrap();

        let mut sync = RemoteSync::new(store);
        let seen: Arc<Mutex<Vec<Snapshot>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        sync.resubscribe("alice", move |snapshot| {
            sink.lock().unwrap().push(snapshot);
        })
        .await
        .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 1);
        assert_eq!(
            sync.state(),
            &SubscriptionState::SubscribedFor("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_resubscribe_forwards_changes() {
        let store = Arc::new(MemoryStore::new());
        let mut sync = RemoteSync::new(store.clone());

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        sync.resubscribe("alice", move |snapshot| {
            let _ = tx.send(snapshot);
        })
        .await
        .unwrap();

        assert!(rx.recv().await.unwrap().is_empty());

        store
            .create_entry("alice", &WeightEntry::new(date("2024-01-01"), 182.0))
            .await
            .unwrap();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].weight, 182.0);
    }

    #[tokio::test]
    async fn test_resubscribe_tears_down_stale_user() {
        let store = Arc::new(MemoryStore::new());
        let mut sync = RemoteSync::new(store.clone());

        let (alice_tx, mut alice_rx) = tokio::sync::mpsc::unbounded_channel();
        sync.resubscribe("alice", move |snapshot| {
            let _ = alice_tx.send(snapshot);
        })
        .await
        .unwrap();
        assert!(alice_rx.recv().await.is_some());

        let (bob_tx, mut bob_rx) = tokio::sync::mpsc::unbounded_channel();
        sync.resubscribe("bob", move |snapshot| {
            let _ = bob_tx.send(snapshot);
        })
        .await
        .unwrap();
        assert!(bob_rx.recv().await.is_some());

        // A write to alice's collection must not reach the old callback.
        store
            .create_entry("alice", &WeightEntry::new(date("2024-01-01"), 182.0))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe_resets_state() {
        let store = Arc::new(MemoryStore::new());
        let mut sync = RemoteSync::new(store);
        sync.resubscribe("alice", |_| {}).await.unwrap();

        sync.unsubscribe();
        assert_eq!(sync.state(), &SubscriptionState::Unsubscribed);
    }

    #[tokio::test]
    async fn test_offline_store_surfaces_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let sync = RemoteSync::new(store);

        let result = sync
            .persist_upsert("alice", &WeightEntry::new(date("2024-01-01"), 182.0))
            .await;
        assert!(matches!(result, Err(RemoteError::Unavailable(_))));
    }
}
