//! Linear undo/redo over full snapshots of the entity collections.
//!
//! DESIGN
//! ======
//! Every committed edit records the post-edit `Snapshot`. The cursor points at
//! the snapshot that matches the live document; undo/redo move the cursor and
//! hand back the snapshot to restore. Recording after an undo discards the
//! redo-able tail. Depth is bounded: once the cap is exceeded the oldest
//! snapshot is evicted and can never be restored again.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_CAP;
use crate::doc::Snapshot;

/// Bounded linear history of document snapshots.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    /// Index of the snapshot matching the live document; `None` while empty.
    index: Option<usize>,
    cap: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_cap(HISTORY_CAP)
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history holding at most `cap` snapshots (at least one).
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { entries: VecDeque::with_capacity(cap), index: None, cap }
    }

    /// Drop every entry and start over from `baseline`.
    pub fn reset(&mut self, baseline: Snapshot) {
        self.entries.clear();
        self.index = None;
        self.record(baseline);
    }

    /// Record a post-edit snapshot, discarding any redo-able future.
    pub fn record(&mut self, snapshot: Snapshot) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);
        if self.entries.len() > self.cap {
            self.entries.pop_front();
        }
        self.index = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot. Returns the snapshot to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let i = self.index.filter(|i| *i > 0)? - 1;
        self.index = Some(i);
        self.entries.get(i)
    }

    /// Step forward one snapshot. Returns the snapshot to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let i = self.index? + 1;
        if i >= self.entries.len() {
            return None;
        }
        self.index = Some(i);
        self.entries.get(i)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Cursor into the history; `None` while empty.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.index.and_then(|i| self.entries.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }
}
