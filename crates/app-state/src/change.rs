//! Change records: one immutable entry per grouping mutation.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::snapshot::Grouping;

/// Length of a generated change id.
const CHANGE_ID_LEN: usize = 32;

/// The kind of mutation a change records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Move,
    Merge,
    Create,
    InitialLoad,
    UpdateAlias,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Move => "MOVE",
            ChangeKind::Merge => "MERGE",
            ChangeKind::Create => "CREATE",
            ChangeKind::InitialLoad => "INITIAL_LOAD",
            ChangeKind::UpdateAlias => "UPDATE_ALIAS",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a change: a random alphanumeric token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let token = (0..CHANGE_ID_LEN)
            .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChangeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ChangeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A change before the log has stamped it with an id and timestamp.
#[derive(Clone, Debug)]
pub struct PendingChange {
    pub kind: ChangeKind,
    pub description: String,
    pub source_tracklet_id: Option<String>,
    pub destination_tracklet_id: Option<String>,
    pub moved_images: Vec<String>,
    pub previous_state: Grouping,
    pub current_state: Grouping,
}

impl PendingChange {
    pub fn new(
        kind: ChangeKind,
        description: impl Into<String>,
        previous_state: Grouping,
        current_state: Grouping,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            source_tracklet_id: None,
            destination_tracklet_id: None,
            moved_images: Vec::new(),
            previous_state,
            current_state,
        }
    }

    pub fn source(mut self, tracklet_id: &str) -> Self {
        self.source_tracklet_id = Some(tracklet_id.to_string());
        self
    }

    pub fn destination(mut self, tracklet_id: &str) -> Self {
        self.destination_tracklet_id = Some(tracklet_id.to_string());
        self
    }

    pub fn moved_images(mut self, names: Vec<String>) -> Self {
        self.moved_images = names;
        self
    }
}

/// An immutable record of one grouping mutation, with full before and
/// after snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    id: ChangeId,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: ChangeKind,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_tracklet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination_tracklet_id: Option<String>,
    moved_images: Vec<String>,
    previous_state: Grouping,
    current_state: Grouping,
}

impl Change {
    pub(crate) fn stamp(id: ChangeId, pending: PendingChange) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            kind: pending.kind,
            description: pending.description,
            source_tracklet_id: pending.source_tracklet_id,
            destination_tracklet_id: pending.destination_tracklet_id,
            moved_images: pending.moved_images,
            previous_state: pending.previous_state,
            current_state: pending.current_state,
        }
    }

    pub fn id(&self) -> &ChangeId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source_tracklet_id(&self) -> Option<&str> {
        self.source_tracklet_id.as_deref()
    }

    pub fn destination_tracklet_id(&self) -> Option<&str> {
        self.destination_tracklet_id.as_deref()
    }

    pub fn moved_images(&self) -> &[String] {
        &self.moved_images
    }

    /// The grouping immediately before this mutation.
    pub fn previous_state(&self) -> &Grouping {
        &self.previous_state
    }

    /// The grouping immediately after this mutation.
    pub fn current_state(&self) -> &Grouping {
        &self.current_state
    }
}
