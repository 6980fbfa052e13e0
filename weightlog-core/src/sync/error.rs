//! Remote store error types.

/// Errors surfaced by document store operations.
///
/// All remote failures are converted to a value of this type at the sync
/// boundary; none are allowed to escape as panics into the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The store could not be reached.
    Unavailable(String),
    /// The caller is not permitted to touch this record.
    PermissionDenied(String),
    /// A one-shot query failed.
    Query(String),
    /// A create/update failed.
    Write(String),
    /// A delete failed.
    Delete(String),
    /// A live subscription could not be established.
    Subscription(String),
    /// The addressed record does not exist.
    NotFound(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Unavailable(e) => write!(f, "Store unavailable: {}", e),
            RemoteError::PermissionDenied(e) => write!(f, "Permission denied: {}", e),
            RemoteError::Query(e) => write!(f, "Query failed: {}", e),
            RemoteError::Write(e) => write!(f, "Write failed: {}", e),
            RemoteError::Delete(e) => write!(f, "Delete failed: {}", e),
            RemoteError::Subscription(e) => write!(f, "Subscription failed: {}", e),
            RemoteError::NotFound(id) => write!(f, "Record not found: {}", id),
        }
    }
}

impl std::error::Error for RemoteError {}
