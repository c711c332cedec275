//! WASM API for the answer editor
//!
//! The page creates one editor, forwards every DOM event to it, then drains
//! the queued effects and applies them. All functions operate on the single
//! editor instance owned here.

use std::sync::{Mutex, MutexGuard};

use lazy_static::lazy_static;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, deserialize_or_default, editor_error, serialize, validation_error};
use crate::analyze::analyze;
use crate::editor::special_chars;
use crate::editor::{ClipboardPayload, Editor, KeyInput, KeyOutcome};
use crate::models::{EditorConfig, EquationId};
use crate::session::{CloseOutcome, RenderTicket};
use crate::wasm_info;

// WASM-owned editor storage (canonical source of truth)
lazy_static! {
    static ref EDITOR: Mutex<Option<Editor>> = Mutex::new(None);
}

fn lock_editor() -> Result<MutexGuard<'static, Option<Editor>>, JsValue> {
    EDITOR
        .lock()
        .map_err(|_| validation_error("Editor lock poisoned"))
}

/// Run `f` against the live editor
fn with_editor<T>(f: impl FnOnce(&mut Editor) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mut guard = lock_editor()?;
    let editor = guard
        .as_mut()
        .ok_or_else(|| validation_error("No editor created"))?;
    f(editor)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClosedEquation {
    equation: EquationId,
    outcome: CloseOutcome,
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Create (or replace) the editor
///
/// `config` may be omitted for defaults; missing fields take defaults too.
#[wasm_bindgen(js_name = createEditor)]
pub fn create_editor(config: JsValue) -> Result<(), JsValue> {
    wasm_info!("createEditor called");

    let config: EditorConfig = deserialize_or_default(config, "EditorConfig deserialization error")?;
    let editor = Editor::new(config).map_err(editor_error)?;
    *lock_editor()? = Some(editor);

    wasm_info!("createEditor completed successfully");
    Ok(())
}

/// Replace the document with saved answer markup
#[wasm_bindgen(js_name = loadHtml)]
pub fn load_html(html: &str) -> Result<(), JsValue> {
    wasm_info!("loadHtml called ({} bytes)", html.len());
    with_editor(|editor| {
        editor.load_html(html);
        Ok(())
    })
}

#[wasm_bindgen(js_name = focusHost)]
pub fn focus_host() -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.focus_host();
        Ok(())
    })
}

#[wasm_bindgen(js_name = blur)]
pub fn blur() -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.blur();
        Ok(())
    })
}

// ============================================================================
// Host text editing
// ============================================================================

#[wasm_bindgen(js_name = setCursor)]
pub fn set_cursor(pos: usize) -> Result<(), JsValue> {
    with_editor(|editor| editor.set_cursor(pos).map_err(editor_error))
}

#[wasm_bindgen(js_name = setSelection)]
pub fn set_selection(anchor: usize, head: usize) -> Result<(), JsValue> {
    with_editor(|editor| editor.set_selection(anchor, head).map_err(editor_error))
}

#[wasm_bindgen(js_name = typeText)]
pub fn type_text(text: &str) -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.type_text(text);
        Ok(())
    })
}

#[wasm_bindgen(js_name = insertLineBreak)]
pub fn insert_line_break() -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.insert_line_break();
        Ok(())
    })
}

#[wasm_bindgen(js_name = backspace)]
pub fn backspace() -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.backspace();
        Ok(())
    })
}

#[wasm_bindgen(js_name = deleteForward)]
pub fn delete_forward() -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.delete_forward();
        Ok(())
    })
}

/// Special characters for the toolbar (`popularOnly` limits to the short list)
#[wasm_bindgen(js_name = getSpecialCharacters)]
pub fn get_special_characters(popular_only: bool) -> Result<JsValue, JsValue> {
    if popular_only {
        let popular: Vec<_> = special_chars::popular().collect();
        serialize(&popular, "SpecialCharacter serialization error")
    } else {
        serialize(&special_chars::SPECIAL_CHARACTERS, "SpecialCharacter serialization error")
    }
}

#[wasm_bindgen(js_name = insertSpecialCharacter)]
pub fn insert_special_character(command: &str) -> Result<JsValue, JsValue> {
    wasm_info!("insertSpecialCharacter called: {}", command);
    with_editor(|editor| {
        let outcome = editor.insert_special_character(command).map_err(editor_error)?;
        serialize(&outcome, "SpecialCharacterOutcome serialization error")
    })
}

// ============================================================================
// Equation editor
// ============================================================================

/// Insert a new equation at the caret and open it; returns its id
#[wasm_bindgen(js_name = insertEquation)]
pub fn insert_equation() -> Result<String, JsValue> {
    wasm_info!("insertEquation called");
    with_editor(|editor| {
        let id = editor.insert_equation().map_err(editor_error)?;
        Ok(id.to_string())
    })
}

/// Open the equation with the given element id (e.g. `math-editor-3`)
#[wasm_bindgen(js_name = openEquation)]
pub fn open_equation(id: &str) -> Result<JsValue, JsValue> {
    wasm_info!("openEquation called: {}", id);
    with_editor(|editor| {
        let session = editor
            .open_equation(&EquationId::from(id))
            .map_err(editor_error)?;
        serialize(&session, "SessionId serialization error")
    })
}

/// Close the open equation; resolves to `null` when none was open
#[wasm_bindgen(js_name = closeEquation)]
pub fn close_equation() -> Result<JsValue, JsValue> {
    wasm_info!("closeEquation called");
    with_editor(|editor| {
        let closed = editor
            .close_equation()
            .map(|(equation, outcome)| ClosedEquation { equation, outcome });
        serialize(&closed, "ClosedEquation serialization error")
    })
}

#[wasm_bindgen(js_name = mathFieldEdited)]
pub fn math_field_edited(latex: &str) -> Result<(), JsValue> {
    with_editor(|editor| editor.math_field_edited(latex).map_err(editor_error))
}

#[wasm_bindgen(js_name = latexFieldEdited)]
pub fn latex_field_edited(latex: &str) -> Result<(), JsValue> {
    with_editor(|editor| editor.latex_field_edited(latex).map_err(editor_error))
}

/// Undo in the open equation; returns the restored LaTeX or `undefined`
#[wasm_bindgen(js_name = undo)]
pub fn undo() -> Result<Option<String>, JsValue> {
    wasm_info!("undo called");
    with_editor(|editor| editor.undo().map_err(editor_error))
}

/// Redo in the open equation; returns the restored LaTeX or `undefined`
#[wasm_bindgen(js_name = redo)]
pub fn redo() -> Result<Option<String>, JsValue> {
    wasm_info!("redo called");
    with_editor(|editor| editor.redo().map_err(editor_error))
}

#[wasm_bindgen(js_name = canUndo)]
pub fn can_undo() -> Result<bool, JsValue> {
    let guard = lock_editor()?;
    Ok(guard.as_ref().is_some_and(|e| e.history_state().can_undo))
}

#[wasm_bindgen(js_name = canRedo)]
pub fn can_redo() -> Result<bool, JsValue> {
    let guard = lock_editor()?;
    Ok(guard.as_ref().is_some_and(|e| e.history_state().can_redo))
}

/// Report the outcome of a render request
///
/// `ticket` is the one carried by the `requestRender` effect; `error` is the
/// service's message when the LaTeX could not be rendered. Returns whether
/// the result was still current.
#[wasm_bindgen(js_name = renderFinished)]
pub fn render_finished(ticket: JsValue, error: Option<String>) -> Result<bool, JsValue> {
    let ticket: RenderTicket = deserialize(ticket, "RenderTicket deserialization error")?;
    with_editor(|editor| {
        let result = match error {
            Some(message) => Err(message),
            None => Ok(()),
        };
        Ok(editor.render_finished(ticket, result))
    })
}

// ============================================================================
// Keyboard and clipboard
// ============================================================================

/// Forward a keydown; `true` means the page must prevent the default action
#[wasm_bindgen(js_name = keyDown)]
pub fn key_down(event: JsValue) -> Result<bool, JsValue> {
    let input: KeyInput = deserialize(event, "KeyInput deserialization error")?;
    with_editor(|editor| {
        let outcome = editor.handle_key(&input).map_err(editor_error)?;
        Ok(outcome == KeyOutcome::Handled)
    })
}

fn paste(payload: ClipboardPayload) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let outcome = editor.paste(&payload).map_err(editor_error)?;
        serialize(&outcome, "PasteOutcome serialization error")
    })
}

#[wasm_bindgen(js_name = pasteText)]
pub fn paste_text(text: &str) -> Result<JsValue, JsValue> {
    wasm_info!("pasteText called ({} bytes)", text.len());
    paste(ClipboardPayload::text(text))
}

#[wasm_bindgen(js_name = pasteHtml)]
pub fn paste_html(html: &str) -> Result<JsValue, JsValue> {
    wasm_info!("pasteHtml called ({} bytes)", html.len());
    paste(ClipboardPayload::html(html))
}

#[wasm_bindgen(js_name = pasteImage)]
pub fn paste_image(mime_type: &str, data: &[u8]) -> Result<JsValue, JsValue> {
    wasm_info!("pasteImage called: {} ({} bytes)", mime_type, data.len());
    paste(ClipboardPayload::image(mime_type, data))
}

// ============================================================================
// Output
// ============================================================================

/// Take all effects queued since the last call
#[wasm_bindgen(js_name = drainEffects)]
pub fn drain_effects() -> Result<JsValue, JsValue> {
    with_editor(|editor| serialize(&editor.drain_effects(), "Effect serialization error"))
}

/// The answer to submit: `{ answerHTML, answerText, imageCount }`
#[wasm_bindgen(js_name = getAnswer)]
pub fn get_answer() -> Result<JsValue, JsValue> {
    wasm_info!("getAnswer called");
    with_editor(|editor| {
        let answer = analyze(editor);
        serialize(&answer, "Answer serialization error")
    })
}

#[wasm_bindgen(js_name = getLiveHtml)]
pub fn get_live_html() -> Result<String, JsValue> {
    with_editor(|editor| Ok(editor.live_html()))
}

#[wasm_bindgen(js_name = getContentHtml)]
pub fn get_content_html() -> Result<String, JsValue> {
    with_editor(|editor| Ok(editor.content_html()))
}

#[wasm_bindgen(js_name = getTextContent)]
pub fn get_text_content() -> Result<String, JsValue> {
    with_editor(|editor| Ok(editor.text_content()))
}
