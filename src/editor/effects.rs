//! Effects the host must carry out after an editor event
//!
//! The core never touches the DOM. Anything the page has to do (update the
//! math field, fetch a rendering, show the error badge) is queued here in
//! event order and drained by the host.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::EquationId;
use crate::session::{CloseOutcome, RenderTicket, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Effect {
    SessionOpened {
        session: SessionId,
        equation: EquationId,
        latex: String,
    },
    SessionClosed {
        session: SessionId,
        equation: EquationId,
        outcome: CloseOutcome,
    },
    /// Replace the structured math field's content
    SyncMathField { latex: String },
    /// Replace the raw LaTeX field's text
    SyncLatexField { latex: String },
    /// Run a LaTeX command in the math field (e.g. `\sqrt`)
    WriteMathCommand { command: String },
    /// Ask the equation image service to render `latex`
    RequestRender { ticket: RenderTicket, latex: String },
    RenderError { message: String },
    ClearRenderError,
    /// Undo/redo affordances must now show this availability
    HistoryChanged { can_undo: bool, can_redo: bool },
    PasteRejected { mime_type: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectQueue {
    pending: VecDeque<Effect>,
}

impl EffectQueue {
    pub fn push(&mut self, effect: Effect) {
        self.pending.push_back(effect);
    }

    pub fn drain(&mut self) -> Vec<Effect> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.pending.iter()
    }
}
