//! Parsing module for the answer editor
//!
//! Converts (sanitized) answer markup into inline content.

pub mod html;
pub mod text;

pub use html::{parse_fragment, ParsedInline};
pub use text::{parse_text, text_units};
