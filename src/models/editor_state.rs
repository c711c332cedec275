//! Editor state management
//!
//! This module contains the EditorState struct which represents the host
//! document together with the caret and selection. Every structural edit of
//! the host document goes through here.

use serde::{Deserialize, Serialize};

use super::content::Inline;
use super::document::Document;
use super::errors::{EditorError, EditorResult};
use crate::parse::text_units;
use crate::text::{Selection, TextRange};

/// Host document state (document + caret + selection)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorState {
    /// The document being edited
    pub document: Document,

    /// Current caret position
    cursor: usize,

    /// Current selection (if any)
    selection: Option<Selection>,
}

impl EditorState {
    /// Create a new editor state with the caret at the start
    pub fn new(document: Document) -> Self {
        Self {
            document,
            cursor: 0,
            selection: None,
        }
    }

    /// Create a new editor state with the caret after the last item
    pub fn at_end(document: Document) -> Self {
        let cursor = document.len();
        Self {
            document,
            cursor,
            selection: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the caret, clearing any selection
    pub fn set_cursor(&mut self, pos: usize) -> EditorResult<()> {
        self.check_position(pos)?;
        self.cursor = pos;
        self.selection = None;
        Ok(())
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Select a range; both endpoints must lie inside the document
    pub fn set_selection(&mut self, selection: Selection) -> EditorResult<()> {
        self.check_position(selection.anchor)?;
        self.check_position(selection.head)?;
        self.cursor = selection.head;
        self.selection = if selection.is_collapsed() {
            None
        } else {
            Some(selection)
        };
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Clamp caret and selection to document bounds
    pub fn validate_cursor(&mut self) {
        let len = self.document.len();
        self.cursor = self.cursor.min(len);
        if let Some(sel) = self.selection {
            if sel.end() > len {
                self.selection = None;
            }
        }
    }

    fn check_position(&self, pos: usize) -> EditorResult<()> {
        let len = self.document.len();
        if pos > len {
            return Err(EditorError::PositionOutOfBounds { pos, len });
        }
        Ok(())
    }

    /// Delete the selected items, leaving the caret where they started
    pub fn delete_selection(&mut self) -> Vec<Inline> {
        match self.selection.take() {
            Some(sel) => {
                let range = sel.range();
                self.cursor = range.start;
                self.document.remove_range(range)
            }
            None => Vec::new(),
        }
    }

    /// Insert items at the caret, replacing the selection if there is one
    ///
    /// Returns the range the new items occupy.
    pub fn insert_at_cursor(&mut self, items: Vec<Inline>) -> TextRange {
        self.delete_selection();
        let start = self.cursor;
        let count = self.document.insert(start, items);
        self.cursor = start + count;
        TextRange::new(start, start + count)
    }

    pub fn type_text(&mut self, text: &str) -> TextRange {
        self.insert_at_cursor(text_to_inlines(text))
    }

    pub fn insert_line_break(&mut self) -> TextRange {
        self.insert_at_cursor(vec![Inline::LineBreak])
    }

    /// Delete the selection, or the single item before the caret
    pub fn backspace(&mut self) -> Vec<Inline> {
        if self.selection.is_some() {
            return self.delete_selection();
        }
        if self.cursor == 0 {
            return Vec::new();
        }
        self.cursor -= 1;
        self.document.remove_range(TextRange::single(self.cursor))
    }

    /// Delete the selection, or the single item after the caret
    pub fn delete_forward(&mut self) -> Vec<Inline> {
        if self.selection.is_some() {
            return self.delete_selection();
        }
        if self.cursor >= self.document.len() {
            return Vec::new();
        }
        self.document.remove_range(TextRange::single(self.cursor))
    }

    /// Put the caret right after the item at `index`, skipping a line break
    /// that immediately follows it
    pub fn place_cursor_after(&mut self, index: usize) {
        let mut pos = index + 1;
        if self.document.get(pos).is_some_and(Inline::is_line_break) {
            pos += 1;
        }
        self.cursor = pos.min(self.document.len());
        self.selection = None;
    }

    /// Keep the caret stable after the item at `index` was removed
    pub fn item_removed_at(&mut self, index: usize) {
        if self.cursor > index {
            self.cursor -= 1;
        }
        self.selection = None;
        self.validate_cursor();
    }
}

/// Characters as inlines; `\n` (and `\r\n`) become line breaks
pub fn text_to_inlines(text: &str) -> Vec<Inline> {
    text_units(text)
        .map(|unit| unit.map_or(Inline::LineBreak, Inline::Char))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::equation::{EquationId, EquationNode};

    fn state_with_text(text: &str) -> EditorState {
        let mut state = EditorState::default();
        state.type_text(text);
        state
    }

    #[test]
    fn test_editor_state_new() {
        let state = EditorState::new(Document::new());

        assert_eq!(state.cursor(), 0);
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_type_and_erase() {
        let mut state = state_with_text("Hello World!");
        assert_eq!(state.document.text_content(), "Hello World!");

        for _ in 0..7 {
            state.backspace();
        }
        assert_eq!(state.document.text_content(), "Hello");
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut state = EditorState::default();
        assert!(state.backspace().is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_set_cursor_clears_selection() {
        let mut state = state_with_text("Hello");
        state.set_selection(Selection::new(0, 5)).unwrap();
        assert!(state.selection().is_some());

        state.set_cursor(3).unwrap();
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_selection_out_of_bounds_fails() {
        let mut state = state_with_text("abc");
        let err = state.set_selection(Selection::new(1, 9)).unwrap_err();
        assert_eq!(err, EditorError::PositionOutOfBounds { pos: 9, len: 3 });
        // Previous state untouched
        assert_eq!(state.cursor(), 3);
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut state = state_with_text("Hello World");
        state.set_selection(Selection::new(11, 6)).unwrap();
        state.type_text("there");
        assert_eq!(state.document.text_content(), "Hello there");
        assert_eq!(state.cursor(), 11);
    }

    #[test]
    fn test_newlines_become_breaks() {
        let state = state_with_text("a\r\nb\nc");
        assert_eq!(state.document.len(), 5);
        assert!(state.document.get(1).unwrap().is_line_break());
        assert_eq!(state.document.text_content(), "a\nb\nc");
    }

    #[test]
    fn test_place_cursor_after_skips_trailing_break() {
        let mut state = EditorState::default();
        let id = state.document.allocate_equation_id();
        state.insert_at_cursor(vec![
            Inline::Equation(EquationNode::empty(id)),
            Inline::LineBreak,
            Inline::Char('x'),
        ]);

        state.place_cursor_after(0);
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn test_place_cursor_after_without_break() {
        let mut state = EditorState::default();
        state.insert_at_cursor(vec![
            Inline::Equation(EquationNode::empty(EquationId::from_index(1))),
            Inline::Char('x'),
        ]);

        state.place_cursor_after(0);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_validate_cursor_clamps_to_bounds() {
        let mut state = state_with_text("abc");
        state.document.remove_range(TextRange::new(0, 3));
        state.validate_cursor();
        assert_eq!(state.cursor(), 0);
    }
}
