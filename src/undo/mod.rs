//! Undo/redo history for one equation editor session
//!
//! The history holds the session's current LaTeX plus a stack of recorded
//! changes. It belongs to exactly one session and is dropped with it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::config::DEFAULT_HISTORY_LIMIT;

/// One recorded edit: the LaTeX before and after it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub before: String,
    pub after: String,
}

/// Linear, bounded LaTeX history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoHistory {
    /// Recorded changes, oldest first
    changes: VecDeque<Change>,
    /// Position in `changes`; everything at or after it is the redo tail
    current_index: usize,
    /// Maximum number of changes to keep
    max_size: usize,
    /// Snapshot the session currently shows
    current: String,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_HISTORY_LIMIT)
    }
}

impl UndoHistory {
    /// Fresh single-entry history seeded with `seed`
    pub fn new(seed: String, max_size: usize) -> Self {
        Self {
            changes: VecDeque::new(),
            current_index: 0,
            max_size: max_size.max(1),
            current: seed,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Record a new snapshot
    ///
    /// Drops any redo tail. A snapshot equal to the current one is not an
    /// edit and records nothing; returns whether anything was recorded.
    pub fn push(&mut self, snapshot: impl Into<String>) -> bool {
        let snapshot = snapshot.into();
        if snapshot == self.current {
            return false;
        }

        // Truncate any redo history when new change is added
        self.changes.truncate(self.current_index);
        let before = std::mem::replace(&mut self.current, snapshot.clone());
        self.changes.push_back(Change {
            before,
            after: snapshot,
        });
        self.current_index = self.changes.len();

        // Enforce max size
        if self.changes.len() > self.max_size {
            self.changes.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
        true
    }

    /// Step back one change, returning the restored snapshot
    pub fn undo(&mut self) -> Option<String> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        self.current = self.changes[self.current_index].before.clone();
        Some(self.current.clone())
    }

    /// Re-apply the last undone change, returning the restored snapshot
    pub fn redo(&mut self) -> Option<String> {
        if !self.can_redo() {
            return None;
        }
        self.current = self.changes[self.current_index].after.clone();
        self.current_index += 1;
        Some(self.current.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.changes.len()
    }

    /// Number of recorded changes (the cursor ranges over `0..=len`)
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.current_index
    }

    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    pub fn redo_count(&self) -> usize {
        self.changes.len() - self.current_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(snapshots: &[&str]) -> UndoHistory {
        let mut history = UndoHistory::default();
        for s in snapshots {
            history.push(*s);
        }
        history
    }

    #[test]
    fn test_fresh_history_has_nothing_to_undo() {
        let mut history = UndoHistory::new("x^2".to_string(), 10);
        assert_eq!(history.current(), "x^2");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_undo_walks_back() {
        let mut history = history_with(&["a", "ab", "abc"]);
        assert_eq!(history.undo().as_deref(), Some("ab"));
        assert_eq!(history.undo().as_deref(), Some("a"));
        assert_eq!(history.undo().as_deref(), Some(""));
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_redo_restores_exact_snapshot() {
        let mut history = history_with(&["\\sqrt{ }", "\\sqrt{1}"]);
        assert_eq!(history.undo().as_deref(), Some("\\sqrt{ }"));
        assert!(history.can_redo());
        assert_eq!(history.redo().as_deref(), Some("\\sqrt{1}"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_after_undo_truncates_redo() {
        let mut history = history_with(&["\\sqrt{ }", "\\sqrt{1}"]);
        history.undo();
        assert!(history.push("\\sqrt{2}"));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo().as_deref(), Some("\\sqrt{ }"));
        assert_eq!(history.redo().as_deref(), Some("\\sqrt{2}"));
    }

    #[test]
    fn test_unchanged_snapshot_is_not_recorded() {
        let mut history = history_with(&["a"]);
        history.undo();
        assert!(!history.push(""));
        assert!(history.can_redo());
    }

    #[test]
    fn test_max_size_enforced() {
        let mut history = UndoHistory::new(String::new(), 3);
        for s in ["1", "12", "123", "1234", "12345"] {
            history.push(s);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo_count(), 3);
        history.undo();
        history.undo();
        assert_eq!(history.undo().as_deref(), Some("12"));
        assert!(!history.can_undo());
        assert_eq!(history.redo_count(), 3);
    }
}
