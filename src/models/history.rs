// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo/redo history over keyframe-list snapshots.

use super::keyframe::Keyframe;

/// History system for undo/redo functionality.
#[derive(Debug)]
pub struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Vec<Keyframe>>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Vec<Keyframe>>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(50)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Save current state before making a change
    pub fn push(&mut self, keyframes: Vec<Keyframe>) {
        self.undo_stack.push(keyframes);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // A new edit invalidates anything that was undone.
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    pub fn undo(&mut self, current: Vec<Keyframe>) -> Option<Vec<Keyframe>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    pub fn redo(&mut self, current: Vec<Keyframe>) -> Option<Vec<Keyframe>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    /// Forget the most recent snapshot without restoring it.
    pub fn discard_last(&mut self) -> Option<Vec<Keyframe>> {
        self.undo_stack.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::keyframe::KeyframeId;
    use crate::util::geometry::Rect;

    fn list(n: u64) -> Vec<Keyframe> {
        (1..=n)
            .map(|i| Keyframe::new(KeyframeId(i), Rect::default(), ""))
            .collect()
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = History::new();
        assert!(!history.can_undo());

        history.push(list(1));
        let restored = history.undo(list(2)).unwrap();
        assert_eq!(restored.len(), 1);
        assert!(history.can_redo());

        let redone = history.redo(restored).unwrap();
        assert_eq!(redone.len(), 2);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new();
        history.push(list(1));
        history.undo(list(2));
        history.push(list(3));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_discard_last_skips_aborted_edit() {
        let mut history = History::new();
        history.push(list(1));
        history.push(list(2));
        assert_eq!(history.discard_last().unwrap().len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.undo(list(2)).unwrap().len(), 1);
        assert!(history.discard_last().is_none());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::with_capacity(2);
        history.push(list(1));
        history.push(list(2));
        history.push(list(3));
        assert_eq!(history.undo(list(4)).unwrap().len(), 3);
        assert_eq!(history.undo(list(3)).unwrap().len(), 2);
        assert!(history.undo(list(2)).is_none());
    }
}
