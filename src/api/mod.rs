//! Answer Editor WASM API
//!
//! This module provides the JavaScript-facing API for the answer editor.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and logging
//! - `core`: Editor lifecycle, editing, equation, clipboard and output functions

pub mod helpers;
pub mod core;

pub use core::*;
