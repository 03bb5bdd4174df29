//! Immutable grouping snapshots.
//!
//! `Grouping` is the value the store publishes and the value every change
//! record stores twice (before and after). It is an `Arc` around the
//! tracklet list, so cloning is a reference-count bump. Each tracklet's
//! image list is itself shared, so a mutation that touches one tracklet
//! only copies that tracklet's images. A stored snapshot can never observe
//! later edits to the live grouping.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tracklet::Tracklet;

/// An ordered, immutable list of tracklets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grouping(Arc<Vec<Tracklet>>);

impl Grouping {
    pub fn new(tracklets: Vec<Tracklet>) -> Self {
        Self(Arc::new(tracklets))
    }

    /// The empty grouping.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tracklets(&self) -> &[Tracklet] {
        &self.0
    }

    /// Find a tracklet by id.
    pub fn find(&self, tracklet_id: &str) -> Option<&Tracklet> {
        self.0.iter().find(|t| t.id == tracklet_id)
    }

    pub fn contains(&self, tracklet_id: &str) -> bool {
        self.find(tracklet_id).is_some()
    }

    /// Find the tracklet holding an image, and the image's index in it.
    pub fn locate_image(&self, image_name: &str) -> Option<(&Tracklet, usize)> {
        self.0
            .iter()
            .find_map(|t| t.image_position(image_name).map(|idx| (t, idx)))
    }

    /// Total number of images across all tracklets.
    pub fn total_images(&self) -> usize {
        self.0.iter().map(Tracklet::image_count).sum()
    }

    /// A detached copy of the tracklet list to build the next grouping from.
    ///
    /// Tracklets are cloned shallowly: their image lists stay shared until
    /// written through.
    pub fn to_vec(&self) -> Vec<Tracklet> {
        self.0.as_ref().clone()
    }

    /// Whether two groupings are the same allocation.
    pub fn ptr_eq(&self, other: &Grouping) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Grouping {
    type Target = [Tracklet];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Tracklet>> for Grouping {
    fn from(tracklets: Vec<Tracklet>) -> Self {
        Self::new(tracklets)
    }
}

impl FromIterator<Tracklet> for Grouping {
    fn from_iter<I: IntoIterator<Item = Tracklet>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracklet::TrackletImage;

    fn sample() -> Grouping {
        Grouping::new(vec![
            Tracklet::with_images("0", ["a", "b"]),
            Tracklet::with_images("1", ["c"]),
        ])
    }

    #[test]
    fn empty_grouping() {
        let g = Grouping::empty();
        assert!(g.is_empty());
        assert_eq!(g.total_images(), 0);
        assert!(g.find("0").is_none());
    }

    #[test]
    fn find_and_locate() {
        let g = sample();
        assert_eq!(g.len(), 2);
        assert_eq!(g.total_images(), 3);
        assert!(g.contains("1"));
        let (tracklet, idx) = g.locate_image("b").unwrap();
        assert_eq!(tracklet.id, "0");
        assert_eq!(idx, 1);
        assert!(g.locate_image("zz").is_none());
    }

    #[test]
    fn clone_is_shared() {
        let g = sample();
        let snapshot = g.clone();
        assert!(g.ptr_eq(&snapshot));
        assert_eq!(g, snapshot);
    }

    #[test]
    fn editing_a_copy_leaves_snapshot_intact() {
        let g = sample();
        let mut next = g.to_vec();
        next[1].images_mut().push(TrackletImage::new("d"));
        let next = Grouping::new(next);

        assert_eq!(g.find("1").unwrap().image_count(), 1);
        assert_eq!(next.find("1").unwrap().image_count(), 2);
        // Untouched tracklet still shares storage with the snapshot.
        assert!(next[0].shares_images_with(&g[0]));
        assert!(!next[1].shares_images_with(&g[1]));
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "0");
        let back: Grouping = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}
