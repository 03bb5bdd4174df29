//! `tb-tracklet-file` -- Tracklet file upload and export for the tracklet board.
//!
//! This crate sits at the file boundary of the grouping store:
//!
//! - **Load**: Strict parse-and-validate of uploaded tracklet JSON (wrapped or bare array)
//! - **Export**: Sorted, origin-renamed `{ "tracklets": [...] }` documents and timestamped files
//! - **Config**: `ExportConfig` for formatting and naming
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tb_app_state::TrackletStore;
//! use tb_tracklet_file::{export_to_dir, load_into_store, ExportConfig};
//!
//! let mut store = TrackletStore::new();
//! let json = std::fs::read_to_string("tracklets.json").unwrap();
//! load_into_store(&mut store, &json).unwrap();
//!
//! store.merge_tracklets("0", "1");
//!
//! let path = export_to_dir(&store, Path::new("."), &ExportConfig::default()).unwrap();
//! println!("exported to {}", path.display());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod load;
pub mod types;

// Re-export primary API at crate root
pub use config::ExportConfig;
pub use error::{FileError, FileResult};
pub use export::{
    compare_tracklet_ids, export_file_name, export_to_dir, format_for_export, to_json_string,
    write_export,
};
pub use load::{from_json_str, load_into_store, load_tracklets};
pub use types::{ExportDocument, ExportTracklet, ImageRecord, TrackletRecord};
