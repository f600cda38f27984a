//! Bounded undo/redo history of whole-tree snapshots.
//!
//! The history stores up to `capacity + 1` snapshots: the current state and
//! `capacity` predecessors. Recording a new state discards everything after
//! the cursor and evicts the oldest snapshot once the bound is exceeded.

use std::collections::VecDeque;

use tracing::trace;

use crate::value::DocumentValue;

#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<DocumentValue>,
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: DocumentValue, capacity: usize) -> Self {
        let mut snapshots = VecDeque::with_capacity(capacity.saturating_add(1).min(64));
        snapshots.push_back(initial);
        Self {
            snapshots,
            cursor: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all snapshots and start over from `initial`.
    pub fn reset(&mut self, initial: DocumentValue) {
        self.snapshots.clear();
        self.snapshots.push_back(initial);
        self.cursor = 0;
    }

    pub fn record(&mut self, snapshot: DocumentValue) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);

        while self.snapshots.len() > self.capacity + 1 {
            self.snapshots.pop_front();
            trace!(capacity = self.capacity, "history full, evicted oldest snapshot");
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back; returns the snapshot now current.
    pub fn undo(&mut self) -> Option<&DocumentValue> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward; returns the snapshot now current.
    pub fn redo(&mut self) -> Option<&DocumentValue> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    pub fn redo_depth(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }
}
