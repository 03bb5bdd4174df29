//! Counts shown after an upload, before the user starts sorting.

use serde::Serialize;

use crate::tracklet::Tracklet;

/// How well the uploaded image files cover the loaded tracklets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatistics {
    pub tracklet_count: usize,
    pub total_image_count: usize,
    /// Images for which an uploaded file exists.
    pub matched_image_count: usize,
}

impl UploadStatistics {
    /// Compute the counts. `is_available` answers whether the uploader holds
    /// a file for an image name.
    pub fn compute<F>(tracklets: &[Tracklet], is_available: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let total_image_count = tracklets.iter().map(Tracklet::image_count).sum();
        let matched_image_count = tracklets
            .iter()
            .flat_map(|t| t.image_names())
            .filter(|name| is_available(name))
            .count();

        Self {
            tracklet_count: tracklets.len(),
            total_image_count,
            matched_image_count,
        }
    }

    pub fn unmatched_image_count(&self) -> usize {
        self.total_image_count.saturating_sub(self.matched_image_count)
    }

    /// Every referenced image has a file.
    pub fn is_complete(&self) -> bool {
        self.matched_image_count == self.total_image_count
    }
}
