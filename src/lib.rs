//! Answer Editor WASM Module
//!
//! Rich-text answer editing with inline LaTeX equations. The core keeps the
//! document, the equation editor state machine and its undo history; the
//! page applies the effects it queues.

pub mod models;
pub mod text;
pub mod undo;
pub mod sanitize;
pub mod parse;
pub mod session;
pub mod editor;
pub mod analyze;
pub mod api;

// Re-export commonly used types
pub use analyze::analyze;
pub use editor::{ClipboardPayload, Editor, Effect, KeyInput, KeyOutcome};
pub use models::{Answer, EditorConfig, EditorError, EditorResult, EquationId};
pub use sanitize::Sanitizer;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        wasm_warn!("Logger already initialized: {}", e);
    }

    log::info!("Answer Editor WASM module initialized");
}
