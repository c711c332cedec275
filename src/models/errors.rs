//! Error types for editor operations
//!
//! Rejected pastes and sanitizer removals are outcomes, not errors, so they
//! never show up here.

use thiserror::Error;

/// Top-level editor error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// A caret or selection endpoint points outside the document
    #[error("Position {pos} is outside the document (length {len})")]
    PositionOutOfBounds { pos: usize, len: usize },

    /// The equation id does not belong to any node in the document
    #[error("Equation {0} not found in document")]
    EquationNotFound(String),

    /// Operation needs an open equation editor session
    #[error("No equation editor session is open")]
    NoOpenSession,

    /// Host supplied an unusable configuration
    #[error("Invalid editor configuration: {0}")]
    InvalidConfig(String),

    /// Clipboard image bytes could not be turned into an image
    #[error("Clipboard image could not be decoded: {0}")]
    ClipboardDecode(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
