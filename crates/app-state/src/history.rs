//! Snapshot-based change log.
//!
//! Every grouping mutation appends exactly one [`Change`] holding the
//! grouping before and after the mutation. Undo is a rollback, not a step
//! back: it truncates the log at the chosen change, discarding that change
//! and everything recorded after it. There is no redo stack.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = ChangeLog::new();
//! let id = log.append(pending).id().clone();
//!
//! // Roll back to the state before `id`
//! if let Some(change) = log.truncate_from(id.as_str()) {
//!     grouping = change.previous_state().clone();
//! }
//! ```

use crate::change::{Change, ChangeId, PendingChange};

/// Append-only ordered list of changes with prefix truncation.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog {
    changes: Vec<Change>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a pending change with a fresh id and the current time, and
    /// append it to the end of the log.
    pub fn append(&mut self, pending: PendingChange) -> &Change {
        let mut id = ChangeId::generate();
        while self.find(id.as_str()).is_some() {
            id = ChangeId::generate();
        }

        let change = Change::stamp(id, pending);
        tracing::debug!(
            change_id = %change.id(),
            kind = %change.kind(),
            description = change.description(),
            depth = self.changes.len() + 1,
            "Change appended"
        );
        self.changes.push(change);
        &self.changes[self.changes.len() - 1]
    }

    /// Remove the change with `change_id` and every change after it.
    ///
    /// Returns the removed change (whose `previous_state` is the grouping
    /// to restore), or `None` if the id is not in the log.
    pub fn truncate_from(&mut self, change_id: &str) -> Option<Change> {
        let index = self.position(change_id)?;
        let discarded = self.changes.len() - index;
        let change = self.changes.drain(index..).next();
        tracing::debug!(
            change_id,
            discarded,
            remaining = self.changes.len(),
            "Change log truncated"
        );
        change
    }

    /// Discard all history.
    pub fn clear(&mut self) {
        self.changes.clear();
        tracing::debug!("Change log cleared");
    }

    pub fn find(&self, change_id: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.id() == change_id)
    }

    pub fn position(&self, change_id: &str) -> Option<usize> {
        self.changes.iter().position(|c| c.id() == change_id)
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    /// The most recent change.
    pub fn last(&self) -> Option<&Change> {
        self.changes.last()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
