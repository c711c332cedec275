//! Layer 0: caret and selection positions
//!
//! Pure positions with no knowledge of what the inlines contain.

pub mod cursor;

pub use cursor::{Selection, TextRange};
