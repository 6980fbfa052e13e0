//! Weightlog Core Library
//!
//! Entry reconciliation, remote sync and presentation logic for weightlog
//! frontends. Frontends inject a `DocumentStore` and a `Dialog` and drive a
//! `WeightTracker`; everything else (sorting, upsert-by-date, snapshot
//! handling, BMI) lives here.

pub mod bmi;
pub mod dialog;
pub mod identity;
pub mod models;
pub mod present;
pub mod store;
pub mod sync;
pub mod tracker;

pub use bmi::{BmiCategory, BmiReport};
pub use dialog::{Dialog, ScriptedDialog};
pub use identity::{IdentityProvider, LocalIdentity, UserId};
pub use models::{ProfilePatch, UserProfile, WeightEntry};
pub use present::{chart_data, notes_for_label, table_rows, ChartData, ChartPoint, TableRow};
pub use store::{EntryOutcome, EntryStore, RemoveOutcome, ValidationError};
pub use sync::{DocumentStore, MemoryStore, RemoteError, RemoteSync, Snapshot, SubscriptionState};
pub use tracker::{DeleteOutcome, TrackerError, WeightTracker};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
