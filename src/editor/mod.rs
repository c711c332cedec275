//! Answer editor: host document plus the equation editor state machine
//!
//! Every input event (typing, clicks on equations, focus changes, pastes,
//! hot keys, render results) enters through a method on [`Editor`]. Each
//! call runs to completion; the `Opening`, `Committing` and `Discarding`
//! phases are passed through inside a single call, so callers only ever
//! observe `Closed` or `Editing` between events.

pub mod clipboard;
pub mod effects;
pub mod keys;
pub mod special_chars;

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::models::content::{push_escaped_attr, push_escaped_text, write_equation_img};
use crate::models::{
    Document, EditorConfig, EditorError, EditorResult, EditorState, EquationId, EquationNode,
    Inline, NBSP,
};
use crate::parse::parse_fragment;
use crate::sanitize::Sanitizer;
use crate::session::{CloseOutcome, EquationSession, RenderTicket, SessionId, SessionPhase};

pub use clipboard::{ClipboardItem, ClipboardPayload, PasteOutcome};
pub use effects::{Effect, EffectQueue};
pub use keys::{KeyInput, KeyOutcome, Shortcut};
pub use special_chars::{SpecialCharacter, SPECIAL_CHARACTERS};

/// Which surface owns keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Focus {
    #[default]
    Outside,
    Host,
    Equation,
}

/// Availability of the undo/redo affordances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// What inserting a special character did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpecialCharacterOutcome {
    /// Unicode character typed into the answer text
    Text,
    /// Command sent to the open equation's math field
    EquationCommand,
    /// New equation opened, seeded with the command
    EquationOpened { equation: EquationId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    config: EditorConfig,
    sanitizer: Sanitizer,
    state: EditorState,
    session: Option<EquationSession>,
    phase: SessionPhase,
    next_session: u64,
    focus: Focus,
    chrome_visible: bool,
    effects: EffectQueue,
}

impl Editor {
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self {
            sanitizer: Sanitizer::new(&config),
            config,
            state: EditorState::default(),
            session: None,
            phase: SessionPhase::Closed,
            next_session: 1,
            focus: Focus::Outside,
            chrome_visible: true,
            effects: EffectQueue::default(),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn session(&self) -> Option<&EquationSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.effects.drain()
    }

    pub fn pending_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    // ------------------------------------------------------------------
    // Host document
    // ------------------------------------------------------------------

    /// Replace the whole document with saved markup
    ///
    /// Any open session is dropped without committing.
    pub fn load_html(&mut self, html: &str) {
        if let Some(session) = self.session.take() {
            log::info!("Dropping equation session {:?} on load", session.id());
        }
        self.phase = SessionPhase::Closed;

        let clean = self.sanitizer.sanitize(html);
        let parsed = parse_fragment(&clean, &self.config.equation_image_prefix);
        let mut document = Document::new();
        let items = document.materialize(parsed, &self.config.equation_image_prefix);
        document.insert(0, items);
        self.state = EditorState::at_end(document);
        log::debug!("Loaded document with {} items", self.state.document.len());
    }

    /// Focus moved into the host text (typing or clicking outside equations)
    pub fn focus_host(&mut self) {
        self.close_equation();
        self.focus = Focus::Host;
    }

    /// Focus left the editor entirely
    pub fn blur(&mut self) {
        self.close_equation();
        self.focus = Focus::Outside;
    }

    pub fn set_cursor(&mut self, pos: usize) -> EditorResult<()> {
        self.focus_host();
        self.state.set_cursor(pos)
    }

    pub fn set_selection(&mut self, anchor: usize, head: usize) -> EditorResult<()> {
        self.focus_host();
        self.state
            .set_selection(crate::text::Selection::new(anchor, head))
    }

    pub fn type_text(&mut self, text: &str) {
        self.focus_host();
        self.state.type_text(text);
    }

    pub fn insert_line_break(&mut self) {
        self.focus_host();
        self.state.insert_line_break();
    }

    pub fn backspace(&mut self) {
        self.focus_host();
        self.state.backspace();
    }

    pub fn delete_forward(&mut self) {
        self.focus_host();
        self.state.delete_forward();
    }

    /// Insert a toolbar special character into whichever surface has focus
    pub fn insert_special_character(&mut self, command: &str) -> EditorResult<SpecialCharacterOutcome> {
        let entry = special_chars::lookup(command);

        if self.session.is_some() {
            self.effects.push(Effect::WriteMathCommand {
                command: command.to_string(),
            });
            return Ok(SpecialCharacterOutcome::EquationCommand);
        }

        match entry.and_then(|e| e.character) {
            Some(ch) => {
                self.focus_host();
                self.state.insert_at_cursor(vec![Inline::Char(ch)]);
                Ok(SpecialCharacterOutcome::Text)
            }
            None => {
                let equation = self.insert_equation()?;
                self.effects.push(Effect::WriteMathCommand {
                    command: command.to_string(),
                });
                Ok(SpecialCharacterOutcome::EquationOpened { equation })
            }
        }
    }

    // ------------------------------------------------------------------
    // Equation lifecycle
    // ------------------------------------------------------------------

    /// Insert a new, empty equation at the caret and open it
    ///
    /// An open session is closed first.
    pub fn insert_equation(&mut self) -> EditorResult<EquationId> {
        self.close_equation();

        let id = self.state.document.allocate_equation_id();
        let mut items = Vec::with_capacity(3);
        if self.config.pad_equations {
            items.push(Inline::Char(NBSP));
        }
        items.push(Inline::Equation(EquationNode::empty(id.clone())));
        if self.config.pad_equations {
            items.push(Inline::Char(NBSP));
        }
        self.state.insert_at_cursor(items);
        log::debug!("Inserted equation {}", id);

        self.open_session(id.clone())?;
        Ok(id)
    }

    /// Open the equation editor on an existing node (click on its artifact)
    pub fn open_equation(&mut self, id: &EquationId) -> EditorResult<SessionId> {
        if let Some(session) = &self.session {
            if session.target() == id {
                return Ok(session.id());
            }
        }
        if self.state.document.equation(id).is_none() {
            return Err(EditorError::EquationNotFound(id.to_string()));
        }
        self.close_equation();
        self.open_session(id.clone())
    }

    fn open_session(&mut self, target: EquationId) -> EditorResult<SessionId> {
        let seed = self
            .state
            .document
            .equation(&target)
            .map(|node| node.latex.clone())
            .ok_or_else(|| EditorError::EquationNotFound(target.to_string()))?;

        self.phase = SessionPhase::Opening;
        let id = SessionId(self.next_session);
        self.next_session += 1;
        let session = EquationSession::open(id, target.clone(), &seed, self.config.history_limit);

        log::info!("Opened equation session {:?} on {}", id, target);
        self.effects.push(Effect::SessionOpened {
            session: id,
            equation: target,
            latex: seed.clone(),
        });
        self.effects.push(Effect::SyncMathField { latex: seed.clone() });
        self.effects.push(Effect::SyncLatexField { latex: seed.clone() });
        self.effects.push(Effect::ClearRenderError);
        if !session.is_blank() {
            self.effects.push(Effect::RequestRender {
                ticket: session.ticket(),
                latex: seed,
            });
        }

        self.session = Some(session);
        self.phase = SessionPhase::Editing;
        self.focus = Focus::Equation;
        self.push_history_state();
        Ok(id)
    }

    /// Close the open session: commit non-blank LaTeX, discard otherwise
    ///
    /// Returns `None` when nothing was open.
    pub fn close_equation(&mut self) -> Option<(EquationId, CloseOutcome)> {
        let session = self.session.take()?;
        let target = session.target().clone();
        let outcome = session.close_outcome();
        let prefix = self.config.equation_image_prefix.clone();

        match outcome {
            CloseOutcome::Committed => {
                self.phase = SessionPhase::Committing;
                if let Some(node) = self.state.document.equation_mut(&target) {
                    node.render(session.current_latex(), &prefix);
                }
                if let Some(pos) = self.state.document.position_of(&target) {
                    self.state.place_cursor_after(pos);
                }
                log::info!("Committed equation {} as {:?}", target, session.current_latex());
            }
            CloseOutcome::Discarded => {
                self.phase = SessionPhase::Discarding;
                if let Some((pos, _)) = self.state.document.remove_equation(&target) {
                    self.state.item_removed_at(pos);
                }
                log::info!("Discarded empty equation {}", target);
            }
        }

        self.effects.push(Effect::SessionClosed {
            session: session.id(),
            equation: target.clone(),
            outcome,
        });
        self.phase = SessionPhase::Closed;
        if self.focus == Focus::Equation {
            self.focus = Focus::Host;
        }
        self.push_history_state();
        Some((target, outcome))
    }

    /// The structured math field reported new LaTeX
    pub fn math_field_edited(&mut self, latex: &str) -> EditorResult<()> {
        let session = self.session.as_mut().ok_or(EditorError::NoOpenSession)?;
        if let Some(ticket) = session.record_edit(latex) {
            self.effects.push(Effect::SyncLatexField {
                latex: latex.to_string(),
            });
            self.after_latex_change(ticket);
        }
        Ok(())
    }

    /// The raw LaTeX field was edited
    pub fn latex_field_edited(&mut self, latex: &str) -> EditorResult<()> {
        let session = self.session.as_mut().ok_or(EditorError::NoOpenSession)?;
        if let Some(ticket) = session.record_edit(latex) {
            self.effects.push(Effect::SyncMathField {
                latex: latex.to_string(),
            });
            self.after_latex_change(ticket);
        }
        Ok(())
    }

    /// Undo within the open session; returns the restored LaTeX, or `None`
    /// when there was nothing to undo
    pub fn undo(&mut self) -> EditorResult<Option<String>> {
        let session = self.session.as_mut().ok_or(EditorError::NoOpenSession)?;
        match session.undo() {
            Some(ticket) => Ok(Some(self.restore_snapshot(ticket))),
            None => Ok(None),
        }
    }

    pub fn redo(&mut self) -> EditorResult<Option<String>> {
        let session = self.session.as_mut().ok_or(EditorError::NoOpenSession)?;
        match session.redo() {
            Some(ticket) => Ok(Some(self.restore_snapshot(ticket))),
            None => Ok(None),
        }
    }

    pub fn history_state(&self) -> HistoryState {
        self.session
            .as_ref()
            .map(|s| HistoryState {
                can_undo: s.history().can_undo(),
                can_redo: s.history().can_redo(),
            })
            .unwrap_or_default()
    }

    fn restore_snapshot(&mut self, ticket: RenderTicket) -> String {
        let latex = self.current_latex().unwrap_or_default().to_string();
        self.effects.push(Effect::SyncMathField { latex: latex.clone() });
        self.effects.push(Effect::SyncLatexField { latex: latex.clone() });
        self.after_latex_change(ticket);
        latex
    }

    fn after_latex_change(&mut self, ticket: RenderTicket) {
        let latex = self.current_latex().unwrap_or_default().to_string();
        if latex.trim().is_empty() {
            self.effects.push(Effect::ClearRenderError);
        } else {
            self.effects.push(Effect::RequestRender { ticket, latex });
        }
        self.push_history_state();
    }

    fn push_history_state(&mut self) {
        let state = self.history_state();
        self.effects.push(Effect::HistoryChanged {
            can_undo: state.can_undo,
            can_redo: state.can_redo,
        });
    }

    pub fn current_latex(&self) -> Option<&str> {
        self.session.as_ref().map(EquationSession::current_latex)
    }

    /// Deliver the outcome of a render request
    ///
    /// Results for a closed session, or for an edit that has since been
    /// superseded, are dropped. Returns whether the result was applied.
    pub fn render_finished(&mut self, ticket: RenderTicket, result: Result<(), String>) -> bool {
        let Some(session) = self.session.as_mut() else {
            log::debug!("Dropping render result {:?}: no open session", ticket);
            return false;
        };
        let error = result.as_ref().err().cloned();
        if !session.accept_render(ticket, result) {
            log::debug!("Dropping stale render result {:?}", ticket);
            return false;
        }
        match error {
            Some(message) => {
                log::warn!("Equation failed to render: {}", message);
                self.effects.push(Effect::RenderError { message });
            }
            None => self.effects.push(Effect::ClearRenderError),
        }
        true
    }

    // ------------------------------------------------------------------
    // Keyboard and clipboard
    // ------------------------------------------------------------------

    /// Dispatch a keydown to whichever context owns it
    pub fn handle_key(&mut self, input: &KeyInput) -> EditorResult<KeyOutcome> {
        let Some(shortcut) = Shortcut::from_key(input) else {
            return Ok(KeyOutcome::PassThrough);
        };

        let in_session = self.session.is_some();
        match shortcut {
            Shortcut::OpenEquation if !in_session && self.focus == Focus::Host => {
                self.insert_equation()?;
                Ok(KeyOutcome::Handled)
            }
            Shortcut::Undo if in_session => {
                self.undo()?;
                Ok(KeyOutcome::Handled)
            }
            Shortcut::Redo if in_session => {
                self.redo()?;
                Ok(KeyOutcome::Handled)
            }
            Shortcut::Close if in_session => {
                self.close_equation();
                Ok(KeyOutcome::Handled)
            }
            _ => Ok(KeyOutcome::PassThrough),
        }
    }

    /// Insert a classified paste at the caret
    ///
    /// A disallowed image type leaves the document untouched.
    pub fn paste(&mut self, payload: &ClipboardPayload) -> EditorResult<PasteOutcome> {
        let converted = clipboard::payload_to_inlines(payload, &self.config, &self.sanitizer)?;
        let parsed = match converted {
            Ok(parsed) => parsed,
            Err(mime_type) => {
                log::info!("Rejected pasted image of type {}", mime_type);
                self.effects.push(Effect::PasteRejected {
                    mime_type: mime_type.clone(),
                });
                return Ok(PasteOutcome::Rejected { mime_type });
            }
        };

        self.focus_host();
        let items = self
            .state
            .document
            .materialize(parsed, &self.config.equation_image_prefix);
        let range = self.state.insert_at_cursor(items);
        Ok(PasteOutcome::Inserted { count: range.len() })
    }

    /// Classify raw clipboard representations and paste the chosen one
    pub fn paste_items(&mut self, items: &[ClipboardItem]) -> EditorResult<Option<PasteOutcome>> {
        match ClipboardPayload::classify(items) {
            Some(payload) => self.paste(&payload).map(Some),
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------

    /// Hide the equation editor chrome until the guard is dropped
    pub fn hide_chrome(&mut self) -> ChromeGuard<'_> {
        let was_visible = self.chrome_visible;
        self.chrome_visible = false;
        ChromeGuard {
            editor: self,
            was_visible,
        }
    }

    pub fn chrome_visible(&self) -> bool {
        self.chrome_visible
    }

    /// Text as the user sees it, including the open sub-editor's LaTeX text
    /// while its chrome is visible
    pub fn text_content(&self) -> String {
        let open = self.session.as_ref().filter(|_| self.chrome_visible);
        let mut out = String::new();
        for item in self.state.document.items() {
            match item {
                Inline::Char(ch) => out.push(*ch),
                Inline::LineBreak => out.push('\n'),
                Inline::Image { .. } => {}
                Inline::Equation(node) => {
                    if let Some(session) = open.filter(|s| s.target() == &node.id) {
                        out.push_str(session.current_latex());
                    }
                }
            }
        }
        out
    }

    /// Serialized content markup (unsanitized, no editing chrome)
    pub fn content_html(&self) -> String {
        self.state.document.to_html(&self.config.equation_image_prefix)
    }

    /// Markup for the live editing surface
    ///
    /// Equations are wrapped in non-editable spans; the open one carries the
    /// sub-editor chrome when it is visible.
    pub fn live_html(&self) -> String {
        let prefix = &self.config.equation_image_prefix;
        let mut out = String::new();
        for item in self.state.document.items() {
            let Inline::Equation(node) = item else {
                item.write_html(&mut out, prefix);
                continue;
            };

            out.push_str("<span class=\"math-editor-wrapper\" id=\"");
            push_escaped_attr(&mut out, node.id.as_str());
            out.push_str("\" contenteditable=\"false\">");
            if !node.is_blank() {
                write_equation_img(&mut out, node, prefix);
            }
            let open = self
                .session
                .as_ref()
                .filter(|s| self.chrome_visible && s.target() == &node.id);
            if let Some(session) = open {
                out.push_str("<div data-js=\"mathEditor\" class=\"math-editor\">");
                out.push_str("<span class=\"math-editor-latex-field\">");
                push_escaped_text(&mut out, session.current_latex());
                out.push_str("</span></div>");
            }
            out.push_str("</span>");
        }
        out
    }
}

/// Editor with its equation chrome hidden; restores it on drop
pub struct ChromeGuard<'a> {
    editor: &'a mut Editor,
    was_visible: bool,
}

impl Deref for ChromeGuard<'_> {
    type Target = Editor;

    fn deref(&self) -> &Editor {
        self.editor
    }
}

impl Drop for ChromeGuard<'_> {
    fn drop(&mut self) {
        self.editor.chrome_visible = self.was_visible;
    }
}
