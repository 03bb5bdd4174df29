//! Central tracklet store.
//!
//! `TrackletStore` owns the current grouping, the change log and the origin
//! map. It is an explicit context object: the application creates one per
//! session and hands it to whatever renders it. Readers get immutable
//! [`Grouping`] snapshots. The operations below are the only write path,
//! and each one replaces the grouping wholesale and appends exactly one
//! change describing the transition.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::change::{Change, ChangeKind, PendingChange};
use crate::error::{StoreError, StoreResult};
use crate::history::ChangeLog;
use crate::origin::OriginMap;
use crate::snapshot::Grouping;
use crate::tracklet::{is_tracklet_id_unique, next_tracklet_id, Tracklet, TrackletImage};

/// The grouping store for one session.
#[derive(Clone, Debug, Default)]
pub struct TrackletStore {
    tracklets: Grouping,
    changes: ChangeLog,
    origins: OriginMap,
    /// Set by the first `replace_all`. Never reset, not even by undo.
    initialized: bool,
    revision: u64,
}

impl TrackletStore {
    /// Create an empty, uninitialized store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current grouping.
    pub fn tracklets(&self) -> &Grouping {
        &self.tracklets
    }

    /// The change log, oldest first.
    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }

    /// Origin map from the last wholesale load.
    pub fn origins(&self) -> &OriginMap {
        &self.origins
    }

    /// Whether a grouping has been loaded this session.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Counter bumped on every write, for cheap change detection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find_tracklet(&self, tracklet_id: &str) -> Option<&Tracklet> {
        self.tracklets.find(tracklet_id)
    }

    /// Replace the whole grouping, e.g. after loading a file.
    ///
    /// Rebuilds the origin map from the new image names. Only the first call
    /// in a session records a change (INITIAL_LOAD, with an empty previous
    /// state); later calls replace the grouping without logging.
    pub fn replace_all(&mut self, tracklets: Vec<Tracklet>) -> Option<&Change> {
        let grouping = Grouping::new(tracklets);
        self.origins = OriginMap::from_tracklets(&grouping);
        self.tracklets = grouping.clone();
        self.revision += 1;

        info!(
            tracklets = grouping.len(),
            images = grouping.total_images(),
            origins = self.origins.len(),
            first_load = !self.initialized,
            "Tracklets replaced"
        );

        if self.initialized {
            return None;
        }
        self.initialized = true;
        let pending = PendingChange::new(
            ChangeKind::InitialLoad,
            "Initial tracklets loaded",
            Grouping::empty(),
            grouping,
        );
        Some(self.changes.append(pending))
    }

    /// Append a tracklet to the end of the grouping.
    ///
    /// The caller is responsible for the id being unique; see
    /// [`TrackletStore::try_create_tracklet`] for a checked variant.
    pub fn create_tracklet(&mut self, tracklet: Tracklet) -> &Change {
        let previous = self.tracklets.clone();
        let description = format!("Created new tracklet {}", tracklet.id);
        debug!(tracklet_id = %tracklet.id, images = tracklet.image_count(), "Creating tracklet");

        let mut next = previous.to_vec();
        next.push(tracklet);
        self.commit(PendingChange::new(
            ChangeKind::Create,
            description,
            previous,
            Grouping::new(next),
        ))
    }

    /// Like `create_tracklet`, but rejects an id that is already in use.
    pub fn try_create_tracklet(&mut self, tracklet: Tracklet) -> StoreResult<&Change> {
        if !is_tracklet_id_unique(&tracklet.id, &self.tracklets) {
            return Err(StoreError::DuplicateTrackletId { id: tracklet.id });
        }
        Ok(self.create_tracklet(tracklet))
    }

    /// Create an empty tracklet using the next free numeric id. Returns the id.
    pub fn create_next_tracklet(&mut self) -> String {
        let id = next_tracklet_id(&self.tracklets);
        self.create_tracklet(Tracklet::new(id.clone()));
        id
    }

    /// Set or overwrite the alias of a tracklet.
    ///
    /// An unknown id leaves the grouping unchanged but still records an
    /// UPDATE_ALIAS change. The alias is stored as given.
    pub fn set_alias(&mut self, tracklet_id: &str, alias: &str) -> &Change {
        let previous = self.tracklets.clone();
        if !previous.contains(tracklet_id) {
            warn!(tracklet_id, "Alias set on unknown tracklet, grouping unchanged");
        }

        let next: Vec<Tracklet> = previous
            .iter()
            .map(|t| {
                let mut t = t.clone();
                if t.id == tracklet_id {
                    t.alias = Some(alias.to_string());
                }
                t
            })
            .collect();

        self.commit(
            PendingChange::new(
                ChangeKind::UpdateAlias,
                format!("Updated alias for Tracklet {tracklet_id} to \"{alias}\""),
                previous,
                Grouping::new(next),
            )
            .source(tracklet_id),
        )
    }

    /// Rename a tracklet from free-form user input.
    ///
    /// The input is trimmed. Empty input, or input equal to the tracklet id,
    /// records nothing and returns `false`.
    pub fn rename_tracklet(&mut self, tracklet_id: &str, input: &str) -> bool {
        let alias = input.trim();
        if alias.is_empty() || alias == tracklet_id {
            debug!(tracklet_id, "Rename ignored");
            return false;
        }
        self.set_alias(tracklet_id, alias);
        true
    }

    /// Move images into `destination_id`, starting at `destination_index`.
    ///
    /// Every image whose name is in `image_names` is removed from whichever
    /// tracklet holds it, not only from `source_id`. The removed images are
    /// inserted in the order they were found (tracklet order, then image
    /// order). An index past the end appends. An empty name list moves
    /// nothing but still records a MOVE change.
    ///
    /// If the destination does not exist the removed images are dropped;
    /// [`TrackletStore::try_move_images`] rejects that case up front.
    pub fn move_images<S: AsRef<str>>(
        &mut self,
        source_id: &str,
        destination_id: &str,
        image_names: &[S],
        destination_index: usize,
    ) -> &Change {
        let previous = self.tracklets.clone();
        let wanted: HashSet<&str> = image_names.iter().map(AsRef::as_ref).collect();

        let mut next = previous.to_vec();
        let mut moved: Vec<TrackletImage> = Vec::new();
        if !wanted.is_empty() {
            for tracklet in &mut next {
                if !tracklet.image_names().any(|name| wanted.contains(name)) {
                    continue;
                }
                tracklet.images_mut().retain(|img| {
                    if wanted.contains(img.name.as_str()) {
                        moved.push(img.clone());
                        false
                    } else {
                        true
                    }
                });
            }
        }

        match next.iter_mut().find(|t| t.id == destination_id) {
            Some(destination) => {
                let images = destination.images_mut();
                let at = destination_index.min(images.len());
                images.splice(at..at, moved.iter().cloned());
            }
            None => warn!(
                destination_id,
                dropped = moved.len(),
                "Move destination not found, images dropped"
            ),
        }

        let moved_names: Vec<String> = moved.into_iter().map(|img| img.name).collect();
        let count = moved_names.len();
        debug!(source_id, destination_id, moved = count, "Moving images");

        self.commit(
            PendingChange::new(
                ChangeKind::Move,
                format!(
                    "Moved {count} image{} from Tracklet {source_id} to Tracklet {destination_id}",
                    if count > 1 { "s" } else { "" }
                ),
                previous,
                Grouping::new(next),
            )
            .source(source_id)
            .destination(destination_id)
            .moved_images(moved_names),
        )
    }

    /// Like `move_images`, but rejects an unknown destination before removing anything.
    pub fn try_move_images<S: AsRef<str>>(
        &mut self,
        source_id: &str,
        destination_id: &str,
        image_names: &[S],
        destination_index: usize,
    ) -> StoreResult<&Change> {
        if !self.tracklets.contains(destination_id) {
            return Err(StoreError::TrackletNotFound {
                id: destination_id.to_string(),
            });
        }
        Ok(self.move_images(source_id, destination_id, image_names, destination_index))
    }

    /// Merge `source_id` into `destination_id`.
    ///
    /// The source's images are appended to the destination in their existing
    /// order and the source tracklet is removed. A missing source appends
    /// nothing. A missing destination still removes the source, losing its
    /// images. Merging a tracklet into itself removes it as well.
    pub fn merge_tracklets(&mut self, source_id: &str, destination_id: &str) -> &Change {
        let previous = self.tracklets.clone();
        let source_images: Vec<TrackletImage> = previous
            .find(source_id)
            .map(|t| t.images().to_vec())
            .unwrap_or_default();

        if !previous.contains(destination_id) {
            warn!(
                source_id,
                destination_id,
                lost = source_images.len(),
                "Merge destination not found, source images lost"
            );
        }

        let next: Vec<Tracklet> = previous
            .iter()
            .map(|t| {
                let mut t = t.clone();
                if t.id == destination_id {
                    t.images_mut().extend(source_images.iter().cloned());
                }
                t
            })
            .filter(|t| t.id != source_id)
            .collect();

        debug!(source_id, destination_id, images = source_images.len(), "Merging tracklets");

        self.commit(
            PendingChange::new(
                ChangeKind::Merge,
                format!("Merged Tracklet {source_id} into Tracklet {destination_id}"),
                previous,
                Grouping::new(next),
            )
            .source(source_id)
            .destination(destination_id),
        )
    }

    /// Like `merge_tracklets`, but requires both tracklets to exist and differ.
    pub fn try_merge_tracklets(
        &mut self,
        source_id: &str,
        destination_id: &str,
    ) -> StoreResult<&Change> {
        if source_id == destination_id {
            return Err(StoreError::SelfMerge {
                id: source_id.to_string(),
            });
        }
        for id in [source_id, destination_id] {
            if !self.tracklets.contains(id) {
                return Err(StoreError::TrackletNotFound { id: id.to_string() });
            }
        }
        Ok(self.merge_tracklets(source_id, destination_id))
    }

    /// Roll back to the state before `change_id`.
    ///
    /// Restores that change's previous state and discards it along with every
    /// later change. Returns the undone change, or `None` (and does nothing)
    /// if the id is not in the log.
    pub fn undo(&mut self, change_id: &str) -> Option<Change> {
        let Some(change) = self.changes.truncate_from(change_id) else {
            warn!(change_id, "Undo target not found");
            return None;
        };

        self.tracklets = change.previous_state().clone();
        self.revision += 1;
        debug!(
            change_id,
            kind = %change.kind(),
            remaining = self.changes.len(),
            tracklets = self.tracklets.len(),
            "Undo"
        );
        Some(change)
    }

    /// Like `undo`, but reports an unknown change id as an error.
    pub fn try_undo(&mut self, change_id: &str) -> StoreResult<Change> {
        self.undo(change_id).ok_or_else(|| StoreError::ChangeNotFound {
            id: change_id.to_string(),
        })
    }

    /// Discard the whole change log without touching the grouping.
    pub fn clear_changes(&mut self) {
        self.changes.clear();
        self.revision += 1;
    }

    /// Publish the change's current state and append the change.
    fn commit(&mut self, pending: PendingChange) -> &Change {
        self.tracklets = pending.current_state.clone();
        self.revision += 1;
        self.changes.append(pending)
    }
}
