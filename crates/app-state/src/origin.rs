//! Image origin tracking for export-time name recovery.
//!
//! Image names in uploaded files follow `<trackletId>_<imageName>`. On every
//! wholesale load the store rebuilds this map from the names as they are at
//! that moment. The map is not maintained as images move or merge, so after
//! several uploads in one session it only describes the latest one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tracklet::Tracklet;

/// Separator between the originating tracklet id and the image name.
pub const ORIGIN_SEPARATOR: char = '_';

/// Where an image came from, as decoded from its name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOrigin {
    pub original_tracklet_id: String,
    pub image_name: String,
}

impl ImageOrigin {
    /// Split a name on the first separator. Names without one have no origin.
    pub fn parse(name: &str) -> Option<Self> {
        let (tracklet_id, image_name) = name.split_once(ORIGIN_SEPARATOR)?;
        Some(Self {
            original_tracklet_id: tracklet_id.to_string(),
            image_name: image_name.to_string(),
        })
    }
}

/// Lookup from a current image name to its decoded origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OriginMap {
    entries: HashMap<String, ImageOrigin>,
}

impl OriginMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from scratch for every image in `tracklets`.
    pub fn from_tracklets(tracklets: &[Tracklet]) -> Self {
        let entries = tracklets
            .iter()
            .flat_map(|t| t.image_names())
            .filter_map(|name| ImageOrigin::parse(name).map(|origin| (name.to_string(), origin)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, image_name: &str) -> Option<&ImageOrigin> {
        self.entries.get(image_name)
    }

    /// Name an image is exported under when it sits in `current_tracklet_id`.
    ///
    /// With a known origin this is
    /// `<currentTrackletId>_<originalTrackletId>_<originalImageName>`;
    /// otherwise the current name is returned unchanged.
    pub fn export_name(&self, current_tracklet_id: &str, image_name: &str) -> String {
        match self.entries.get(image_name) {
            Some(origin) => format!(
                "{current_tracklet_id}{sep}{}{sep}{}",
                origin.original_tracklet_id,
                origin.image_name,
                sep = ORIGIN_SEPARATOR
            ),
            None => image_name.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
