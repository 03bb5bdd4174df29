//! Error types for the strict store operations (thiserror-based).

use thiserror::Error;

/// Errors reported by the `try_*` variants of the store operations.
///
/// The lenient operations never fail: they degrade to no-ops and still
/// record a change. The strict variants check their inputs first and
/// leave both the grouping and the change log untouched on error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No tracklet with the given id exists in the current grouping.
    #[error("Tracklet not found: {id}")]
    TrackletNotFound { id: String },

    /// A tracklet with the given id already exists.
    #[error("Duplicate tracklet id: {id}")]
    DuplicateTrackletId { id: String },

    /// No change with the given id exists in the change log.
    #[error("Change not found: {id}")]
    ChangeNotFound { id: String },

    /// A tracklet cannot be merged into itself.
    #[error("Cannot merge tracklet {id} into itself")]
    SelfMerge { id: String },
}

/// Convenience Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
