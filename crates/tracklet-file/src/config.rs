//! Export configuration.

use serde::{Deserialize, Serialize};

use crate::error::FileResult;

/// How export files are formatted and named.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pretty-print with two-space indentation.
    pub pretty: bool,
    /// File name prefix; the full name is `<prefix>-<timestamp>.json`.
    pub file_prefix: String,
    /// Sort tracklets by numeric id. When false the store order is kept.
    pub sort_tracklets: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            file_prefix: "tracklets".to_string(),
            sort_tracklets: true,
        }
    }
}

impl ExportConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> FileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
