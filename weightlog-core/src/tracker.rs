//! Weight tracker: entry store + remote sync + dialogs, wired together.
//!
//! This is the layer a frontend talks to. Local state holds only confirmed
//! data: a write is persisted first and folded into the entry store once the
//! remote store acknowledges it, and live snapshots replace local state
//! wholesale. A failed remote call therefore never leaves a half-applied
//! local mutation behind.

use std::sync::{Arc, Mutex};

use tracing::info;
use uuid::Uuid;

use crate::bmi::{self, BmiReport};
use crate::dialog::Dialog;
use crate::identity::UserId;
use crate::models::{ProfilePatch, UserProfile, WeightEntry};
use crate::store::{self, EntryOutcome, EntryStore, RemoveOutcome, ValidationError};
use crate::sync::{DocumentStore, RemoteError, RemoteSync, SubscriptionState};

const DELETE_CONFIRM: &str = "Are you sure you want to delete this entry?";
const BMI_PROMPT: &str = "Enter your current weight (lbs)";

/// Outcome of a user-initiated delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Entry was already gone; a no-op from the user's perspective.
    NotFound,
    /// The user declined the confirmation; nothing was issued.
    Cancelled,
}

/// Errors from tracker operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// No signed-in user; entry operations are user-scoped.
    NotSignedIn,
    /// Submitted form input was malformed.
    Validation(ValidationError),
    /// A remote call failed; local state is unchanged.
    Remote(RemoteError),
    /// BMI needs a stored height and the profile has none.
    MissingHeight,
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerError::NotSignedIn => write!(f, "You must be signed in to do that"),
            TrackerError::Validation(e) => write!(f, "{}", e),
            TrackerError::Remote(e) => write!(f, "{}", e),
            TrackerError::MissingHeight => {
                write!(f, "Set your height in the profile before computing BMI")
            }
        }
    }
}

impl std::error::Error for TrackerError {}

impl From<ValidationError> for TrackerError {
    fn from(e: ValidationError) -> Self {
        TrackerError::Validation(e)
    }
}

impl From<RemoteError> for TrackerError {
    fn from(e: RemoteError) -> Self {
        TrackerError::Remote(e)
    }
}

/// The tracker owns the per-user entry collection and the sync adapter.
///
/// Dependencies are injected at construction; there are no ambient
/// singletons.
pub struct WeightTracker<S: DocumentStore + 'static> {
    entries: Arc<Mutex<EntryStore>>,
    sync: RemoteSync<S>,
    dialog: Arc<dyn Dialog>,
    user: Option<UserId>,
}

impl<S: DocumentStore + 'static> WeightTracker<S> {
    pub fn new(store: Arc<S>, dialog: Arc<dyn Dialog>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(EntryStore::new())),
            sync: RemoteSync::new(store),
            dialog,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn subscription(&self) -> &SubscriptionState {
        self.sync.state()
    }

    /// Snapshot of the current sorted entries for presentation.
    pub fn entries(&self) -> Vec<WeightEntry> {
        self.entries.lock().unwrap().entries().to_vec()
    }

    /// Reacts to an auth state transition.
    ///
    /// Tears down the previous user's subscription before anything else, so
    /// stale snapshots can never land in the new user's view. Signing out
    /// clears the local collection.
    pub async fn set_user(&mut self, user: Option<UserId>) -> Result<(), RemoteError> {
        self.sync.unsubscribe();
        self.user = user;

        match &self.user {
            Some(user) => {
                let entries = Arc::clone(&self.entries);
                self.sync
                    .resubscribe(user, move |snapshot| {
                        entries.lock().unwrap().replace_all(snapshot);
                    })
                    .await?;
            }
            None => self.entries.lock().unwrap().clear(),
        }
        Ok(())
    }

    /// Validates and records a weight measurement.
    ///
    /// The entry is persisted first; only the acknowledged entry (carrying
    /// its store-assigned id) is folded into local state.
    pub async fn log_entry(
        &self,
        date: &str,
        weight: f64,
        notes: &str,
    ) -> Result<EntryOutcome, TrackerError> {
        let user = self.user.as_ref().ok_or(TrackerError::NotSignedIn)?;

        let date = store::validate_date(date)?;
        let weight = store::validate_weight(weight)?;

        // Carry the id of a same-date local entry so the remote write is an
        // update rather than a fresh lookup. The outcome is decided from this
        // same lookup: a snapshot landing between persist and apply must not
        // turn a first-time log into an update.
        let (existed, existing_id) = {
            let entries = self.entries.lock().unwrap();
            match entries.by_date(date) {
                Some(e) => (true, e.id),
                None => (false, None),
            }
        };

        let mut entry = WeightEntry::new(date, weight).with_notes(notes.trim());
        entry.id = existing_id;

        let acked = self.sync.persist_upsert(user, &entry).await?;
        self.entries.lock().unwrap().apply(acked.clone());
        Ok(if existed {
            EntryOutcome::Updated(acked)
        } else {
            EntryOutcome::Created(acked)
        })
    }

    /// Deletes an entry after explicit user confirmation.
    pub async fn delete_entry(&self, id: Uuid) -> Result<DeleteOutcome, TrackerError> {
        let user = self.user.as_ref().ok_or(TrackerError::NotSignedIn)?;

        if !self.dialog.confirm(DELETE_CONFIRM).await {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.sync.persist_delete(user, id).await?;
        match self.entries.lock().unwrap().remove(id) {
            RemoveOutcome::Removed(entry) => {
                info!(date = %entry.date, "entry deleted");
                Ok(DeleteOutcome::Deleted)
            }
            RemoveOutcome::NotFound => {
                info!(%id, "deleted entry was not in local state");
                Ok(DeleteOutcome::NotFound)
            }
        }
    }

    /// Computes BMI from the stored height and a prompted current weight.
    ///
    /// Returns `Ok(None)` when the user cancels the prompt.
    pub async fn bmi_check(&self) -> Result<Option<BmiReport>, TrackerError> {
        let user = self.user.as_ref().ok_or(TrackerError::NotSignedIn)?;

        let profile = self.sync.load_profile(user).await?;
        let (height_ft, height_in) = profile.height().ok_or(TrackerError::MissingHeight)?;

        let answer = match self.dialog.prompt(BMI_PROMPT).await {
            Some(answer) => answer,
            None => return Ok(None),
        };
        let weight = answer
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidWeight)?;
        let weight = store::validate_weight(weight)?;

        // A stored height can still be unusable (zero, or too large to total
        // up in inches); compute reports that as None.
        let report =
            bmi::compute(height_ft, height_in, weight).ok_or(TrackerError::MissingHeight)?;
        Ok(Some(report))
    }

    pub async fn profile(&self) -> Result<UserProfile, TrackerError> {
        let user = self.user.as_ref().ok_or(TrackerError::NotSignedIn)?;
        Ok(self.sync.load_profile(user).await?)
    }

    /// Merge-saves profile fields; unspecified fields keep their values.
    pub async fn save_profile(&self, patch: &ProfilePatch) -> Result<(), TrackerError> {
        let user = self.user.as_ref().ok_or(TrackerError::NotSignedIn)?;
        Ok(self.sync.merge_profile(user, patch).await?)
    }
}
