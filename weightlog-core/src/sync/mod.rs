//! Sync module.
//!
//! The document store collaborator is a trait; `RemoteSync` adapts entry
//! store operations onto it and turns remote change notifications into
//! snapshot callbacks.
//!
//! ## Flow
//!
//! 1. `resubscribe` opens a per-user live subscription
//! 2. Every remote change delivers a full snapshot (never a partial merge)
//! 3. Local writes go through `persist_upsert` / `persist_delete`
//! 4. Failures surface as `RemoteError` values, never as panics

mod error;
mod memory;
mod remote;

pub use error::RemoteError;
pub use memory::MemoryStore;
pub use remote::{DocumentStore, RemoteSync, Snapshot, SubscriptionState};
