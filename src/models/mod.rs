//! Models module for the answer editor
//!
//! This module contains the data models used by the editing core: the
//! inline content items, equation nodes, the host document with its caret,
//! configuration, errors and the saved answer payload.

pub mod answer;
pub mod config;
pub mod content;
pub mod document;
pub mod editor_state;
pub mod equation;
pub mod errors;

// Re-export commonly used types
pub use answer::Answer;
pub use config::EditorConfig;
pub use content::{Inline, NBSP};
pub use document::Document;
pub use editor_state::EditorState;
pub use equation::{EquationId, EquationNode, ImageRef};
pub use errors::{EditorError, EditorResult};
