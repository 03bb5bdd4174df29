//! `tb-app-state` -- Grouping state for the tracklet board.
//!
//! This crate provides:
//!
//! - **`TrackletStore`**: Session context holding the grouping, the change log and the origin map.
//!   Its operations (load, create, alias, move, merge, undo) are the only write path.
//! - **`Grouping`**: Immutable, cheaply clonable tracklet list used for publishing and snapshots.
//! - **`ChangeLog`**: Append-only history of `Change` records with prefix-truncating undo.
//! - **`OriginMap`**: Export-time recovery of an image's original tracklet id.
//! - **`SelectionState`**: Image and tracklet selection driving drag-drop and batch merge.
//! - **`UploadStatistics`**: Coverage of loaded tracklets by uploaded image files.
//!
//! # Architecture
//!
//! ```text
//! TrackletStore (session context)
//! ├── tracklets: Grouping            (current state, Arc-shared)
//! ├── changes: ChangeLog             (every mutation, before/after snapshots)
//! │   └── Change { kind, previous_state, current_state, .. }
//! ├── origins: OriginMap             (rebuilt on wholesale load only)
//! └── initialized / revision         (session flags)
//!
//! SelectionState
//! ├── images: ImageSelection         (drag source set)
//! └── tracklets: TrackletSelection   (merge set, first = target)
//! ```

pub mod change;
pub mod error;
pub mod history;
pub mod origin;
pub mod selection;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod tracklet;

// Re-export primary types at crate root for convenience.
pub use change::{Change, ChangeId, ChangeKind, PendingChange};
pub use error::{StoreError, StoreResult};
pub use history::ChangeLog;
pub use origin::{ImageOrigin, OriginMap, ORIGIN_SEPARATOR};
pub use selection::{ImageSelection, Modifier, SelectionState, TrackletSelection};
pub use snapshot::Grouping;
pub use state::TrackletStore;
pub use stats::UploadStatistics;
pub use tracklet::{is_tracklet_id_unique, next_tracklet_id, Tracklet, TrackletImage};
