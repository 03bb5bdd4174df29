//! Upload parsing: tracklet JSON into the typed store model.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tb_app_state::{Tracklet, TrackletStore};
use tracing::{debug, error, info, warn};

use crate::error::{FileError, FileResult};
use crate::types::TrackletRecord;

/// Parse an uploaded tracklet document.
///
/// Accepts either `{ "tracklets": [...] }` or a bare array of tracklet
/// records, then validates the records before converting them.
pub fn from_json_str(json: &str) -> FileResult<Vec<Tracklet>> {
    let value: Value = serde_json::from_str(json)?;

    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map.remove("tracklets").ok_or_else(|| {
            FileError::InvalidDocument {
                reason: "object has no \"tracklets\" field".into(),
            }
        })?,
        other => {
            return Err(FileError::InvalidDocument {
                reason: format!("expected an object or an array, got {}", kind_of(&other)),
            })
        }
    };
    if !list.is_array() {
        return Err(FileError::InvalidDocument {
            reason: format!("\"tracklets\" must be an array, got {}", kind_of(&list)),
        });
    }

    let records: Vec<TrackletRecord> = serde_json::from_value(list)?;
    validate_records(&records)?;

    let tracklets: Vec<Tracklet> = records.into_iter().map(Tracklet::from).collect();
    debug!(
        tracklets = tracklets.len(),
        images = tracklets.iter().map(Tracklet::image_count).sum::<usize>(),
        "Parsed tracklet document"
    );
    Ok(tracklets)
}

/// Read and parse a tracklet file.
pub fn load_tracklets(path: &Path) -> FileResult<Vec<Tracklet>> {
    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        });
    }

    let json = std::fs::read_to_string(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to read tracklet file");
        FileError::Io(e)
    })?;

    let tracklets = from_json_str(&json)?;
    info!(
        path = %path.display(),
        tracklets = tracklets.len(),
        "Tracklet file loaded"
    );
    Ok(tracklets)
}

/// Parse `json` and, only if that succeeds, replace the store's grouping.
///
/// A failed parse is logged and returned; the store is left untouched.
/// Returns the number of tracklets loaded.
pub fn load_into_store(store: &mut TrackletStore, json: &str) -> FileResult<usize> {
    let tracklets = from_json_str(json).map_err(|e| {
        error!(error = %e, "Rejected tracklet upload");
        e
    })?;
    let count = tracklets.len();
    store.replace_all(tracklets);
    Ok(count)
}

/// Reject duplicate tracklet ids and images repeated within one tracklet.
///
/// The same image in two tracklets is allowed, with a warning.
fn validate_records(records: &[TrackletRecord]) -> FileResult<()> {
    let mut tracklet_ids = HashSet::new();
    let mut owners: HashSet<&str> = HashSet::new();

    for record in records {
        if !tracklet_ids.insert(record.tracklet_id.as_str()) {
            return Err(FileError::DuplicateTrackletId {
                id: record.tracklet_id.clone(),
            });
        }

        let mut names = HashSet::new();
        for image in &record.images {
            if !names.insert(image.name.as_str()) {
                return Err(FileError::DuplicateImage {
                    tracklet_id: record.tracklet_id.clone(),
                    name: image.name.clone(),
                });
            }
            if !owners.insert(image.name.as_str()) {
                warn!(
                    tracklet_id = %record.tracklet_id,
                    image = %image.name,
                    "Image appears in more than one tracklet"
                );
            }
        }
    }

    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
