//! Image and tracklet selection state.
//!
//! Both selections are insertion-ordered sets: the order in which items were
//! selected matters (the last-selected image anchors range selection, the
//! first-selected tracklet is the merge target).

use serde::{Deserialize, Serialize};

use crate::snapshot::Grouping;
use crate::state::TrackletStore;

/// Modifier held while clicking an image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Plain click: select only the clicked image.
    #[default]
    None,
    /// Ctrl/Cmd click: toggle the clicked image.
    Toggle,
    /// Shift click: extend from the last-selected image.
    Range,
}

/// Which images are currently selected.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImageSelection {
    selected: Vec<String>,
}

impl ImageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click on `image_name`.
    ///
    /// A range click adds every image between the last-selected image and
    /// `image_name` (inclusive) when both sit in the same tracklet, and does
    /// nothing otherwise. A range click with an empty selection behaves like
    /// a plain click.
    pub fn click(&mut self, image_name: &str, modifier: Modifier, grouping: &Grouping) {
        match modifier {
            Modifier::Toggle => self.toggle(image_name),
            Modifier::Range if !self.selected.is_empty() => self.extend_range(image_name, grouping),
            Modifier::Range | Modifier::None => self.select_only(image_name),
        }
    }

    fn select_only(&mut self, image_name: &str) {
        self.selected.clear();
        self.selected.push(image_name.to_string());
    }

    fn toggle(&mut self, image_name: &str) {
        if self.is_selected(image_name) {
            self.selected.retain(|name| name != image_name);
        } else {
            self.selected.push(image_name.to_string());
        }
    }

    fn extend_range(&mut self, image_name: &str, grouping: &Grouping) {
        let Some(anchor) = self.selected.last() else {
            return;
        };
        let (Some((anchor_tracklet, start)), Some((tracklet, end))) =
            (grouping.locate_image(anchor), grouping.locate_image(image_name))
        else {
            return;
        };
        if anchor_tracklet.id != tracklet.id {
            return;
        }

        let (lo, hi) = (start.min(end), start.max(end));
        for img in &tracklet.images()[lo..=hi] {
            if !self.is_selected(&img.name) {
                self.selected.push(img.name.clone());
            }
        }
    }

    pub fn is_selected(&self, image_name: &str) -> bool {
        self.selected.iter().any(|name| name == image_name)
    }

    /// Selected image names in selection order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Finish a drag of `dragged` onto `destination_id` at `destination_index`.
    ///
    /// Moves the whole selection when the dragged image is part of it,
    /// otherwise only the dragged image. The source is the tracklet that
    /// holds the dragged image. The selection is cleared afterwards. Returns
    /// `false` without moving anything if the dragged image is not in the
    /// grouping.
    pub fn drop_onto(
        &mut self,
        store: &mut TrackletStore,
        dragged: &str,
        destination_id: &str,
        destination_index: usize,
    ) -> bool {
        let Some(source_id) = store
            .tracklets()
            .locate_image(dragged)
            .map(|(t, _)| t.id.clone())
        else {
            tracing::warn!(dragged, "Dragged image not found in grouping");
            return false;
        };

        let names = if self.is_selected(dragged) {
            std::mem::take(&mut self.selected)
        } else {
            vec![dragged.to_string()]
        };
        store.move_images(&source_id, destination_id, names.as_slice(), destination_index);
        self.selected.clear();
        true
    }
}

/// Which tracklets are currently selected for merging.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackletSelection {
    selected: Vec<String>,
}

impl TrackletSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click on a tracklet header.
    ///
    /// With `toggle` the tracklet is added or removed. A plain click selects
    /// only this tracklet, or clears the selection if it was the sole one.
    pub fn click(&mut self, tracklet_id: &str, toggle: bool) {
        if toggle {
            if self.is_selected(tracklet_id) {
                self.selected.retain(|id| id != tracklet_id);
            } else {
                self.selected.push(tracklet_id.to_string());
            }
            return;
        }

        let sole = self.selected.len() == 1 && self.is_selected(tracklet_id);
        self.selected.clear();
        if !sole {
            self.selected.push(tracklet_id.to_string());
        }
    }

    /// Merge every selected tracklet into the first-selected one.
    ///
    /// Needs at least two selected tracklets. Records one MERGE change per
    /// source, in selection order, and leaves only the target selected.
    /// Returns how many tracklets were merged.
    pub fn merge_into_first(&mut self, store: &mut TrackletStore) -> usize {
        if self.selected.len() < 2 {
            return 0;
        }
        let target = self.selected[0].clone();
        let sources: Vec<String> = self.selected.drain(1..).collect();
        for source in &sources {
            store.merge_tracklets(source, &target);
        }
        tracing::debug!(target_id = %target, merged = sources.len(), "Merged selected tracklets");
        sources.len()
    }

    pub fn is_selected(&self, tracklet_id: &str) -> bool {
        self.selected.iter().any(|id| id == tracklet_id)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

/// Image and tracklet selection together.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub images: ImageSelection,
    pub tracklets: TrackletSelection,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both selections.
    pub fn clear(&mut self) {
        self.images.clear();
        self.tracklets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.tracklets.is_empty()
    }
}
