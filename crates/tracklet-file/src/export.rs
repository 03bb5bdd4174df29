//! Export formatting and writing.
//!
//! The export file is a one-way snapshot of the current grouping:
//! `{ "tracklets": [{ "tracklet_id", "images": [{ "name" }] }] }`, with
//! tracklets ordered by numeric id, image names rewritten through the
//! origin map and sorted, and aliases dropped.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tb_app_state::{OriginMap, Tracklet, TrackletStore};
use tracing::{debug, error, info};

use crate::config::ExportConfig;
use crate::error::{FileError, FileResult};
use crate::types::{ExportDocument, ExportTracklet, ImageRecord};

/// Build the export document for a grouping.
pub fn format_for_export(
    tracklets: &[Tracklet],
    origins: &OriginMap,
    config: &ExportConfig,
) -> ExportDocument {
    let mut ordered: Vec<&Tracklet> = tracklets.iter().collect();
    if config.sort_tracklets {
        ordered.sort_by(|a, b| compare_tracklet_ids(&a.id, &b.id));
    }

    let tracklets = ordered
        .into_iter()
        .map(|tracklet| {
            let mut names: Vec<String> = tracklet
                .image_names()
                .map(|name| origins.export_name(&tracklet.id, name))
                .collect();
            names.sort();
            ExportTracklet {
                tracklet_id: tracklet.id.clone(),
                images: names.into_iter().map(|name| ImageRecord { name }).collect(),
            }
        })
        .collect();

    ExportDocument { tracklets }
}

/// Order tracklet ids by their numeric value.
///
/// Ids that are not finite numbers sort after all numeric ids, by string.
/// Equal numeric values ("7" and "07") fall back to string order.
pub fn compare_tracklet_ids(a: &str, b: &str) -> Ordering {
    match (numeric_id(a), numeric_id(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn numeric_id(id: &str) -> Option<f64> {
    id.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Serialize an export document.
pub fn to_json_string(doc: &ExportDocument, config: &ExportConfig) -> FileResult<String> {
    let json = if config.pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    debug!(
        tracklets = doc.tracklets.len(),
        json_len = json.len(),
        "Serialized export document"
    );
    Ok(json)
}

/// File name for an export taken at `now`.
///
/// `<prefix>-<ISO 8601 timestamp>.json`, with ':' and '.' in the timestamp
/// replaced by '-', e.g. `tracklets-2024-05-01T09-30-00-250Z.json`.
pub fn export_file_name(now: DateTime<Utc>, config: &ExportConfig) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{stamp}.json", config.file_prefix)
}

/// Write an export document to `path`.
///
/// Data is written to a temporary file next to the target and then renamed,
/// so a crash mid-write never leaves a truncated export behind.
pub fn write_export(doc: &ExportDocument, path: &Path, config: &ExportConfig) -> FileResult<()> {
    let json = to_json_string(doc, config)?;
    let temp_path = path.with_extension("json.tmp");

    std::fs::write(&temp_path, json.as_bytes()).map_err(|e| {
        error!(path = %temp_path.display(), error = %e, "Failed to write temp file");
        FileError::Io(e)
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        error!(
            from = %temp_path.display(),
            to = %path.display(),
            error = %e,
            "Failed to rename temp file to target"
        );
        FileError::Io(e)
    })?;

    info!(
        path = %path.display(),
        tracklets = doc.tracklets.len(),
        images = doc.total_images(),
        "Tracklets exported"
    );
    Ok(())
}

/// Export the store's current grouping into `dir` under a timestamped name.
/// Returns the path written.
pub fn export_to_dir(
    store: &TrackletStore,
    dir: &Path,
    config: &ExportConfig,
) -> FileResult<PathBuf> {
    let doc = format_for_export(store.tracklets(), store.origins(), config);
    let path = dir.join(export_file_name(Utc::now(), config));
    write_export(&doc, &path, config)?;
    Ok(path)
}
