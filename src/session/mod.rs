//! Equation editor session
//!
//! A session is the transient in-place editor bound to one equation node.
//! It owns the single source of truth for the LaTeX being edited (inside its
//! undo history) and the render bookkeeping used to discard stale results.

use serde::{Deserialize, Serialize};

use crate::models::EquationId;
use crate::undo::UndoHistory;

/// Identity of one open/close cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

/// Lifecycle of the equation editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    #[default]
    Closed,
    Opening,
    Editing,
    Committing,
    Discarding,
}

/// Result of the most recent render of the session's LaTeX
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Validity {
    /// Render requested, no answer yet
    Pending,
    Valid,
    Invalid { message: String },
}

/// Keys an in-flight render to the session and edit that requested it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTicket {
    pub session: SessionId,
    pub generation: u64,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CloseOutcome {
    Committed,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationSession {
    id: SessionId,
    target: EquationId,
    history: UndoHistory,
    validity: Validity,
    /// Bumped on every LaTeX change; only the latest render counts
    generation: u64,
}

impl EquationSession {
    /// Open on `target`, seeding a fresh history with its committed LaTeX
    pub fn open(id: SessionId, target: EquationId, seed_latex: &str, history_limit: usize) -> Self {
        let validity = if seed_latex.trim().is_empty() {
            Validity::Valid
        } else {
            Validity::Pending
        };
        Self {
            id,
            target,
            history: UndoHistory::new(seed_latex.to_string(), history_limit),
            validity,
            generation: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn target(&self) -> &EquationId {
        &self.target
    }

    pub fn current_latex(&self) -> &str {
        self.history.current()
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.validity, Validity::Invalid { .. })
    }

    pub fn is_blank(&self) -> bool {
        self.current_latex().trim().is_empty()
    }

    pub fn ticket(&self) -> RenderTicket {
        RenderTicket {
            session: self.id,
            generation: self.generation,
        }
    }

    /// Record an edit; returns the ticket for the render it needs, or `None`
    /// when the LaTeX did not actually change
    pub fn record_edit(&mut self, latex: &str) -> Option<RenderTicket> {
        if !self.history.push(latex) {
            return None;
        }
        Some(self.latex_changed())
    }

    pub fn undo(&mut self) -> Option<RenderTicket> {
        self.history.undo()?;
        Some(self.latex_changed())
    }

    pub fn redo(&mut self) -> Option<RenderTicket> {
        self.history.redo()?;
        Some(self.latex_changed())
    }

    fn latex_changed(&mut self) -> RenderTicket {
        self.generation += 1;
        self.validity = if self.is_blank() {
            Validity::Valid
        } else {
            Validity::Pending
        };
        self.ticket()
    }

    /// Apply a render outcome if it belongs to this session's latest edit
    pub fn accept_render(&mut self, ticket: RenderTicket, result: Result<(), String>) -> bool {
        if ticket != self.ticket() {
            return false;
        }
        self.validity = match result {
            Ok(()) => Validity::Valid,
            Err(message) => Validity::Invalid { message },
        };
        true
    }

    /// Blank LaTeX is discarded, anything else is committed
    pub fn close_outcome(&self) -> CloseOutcome {
        if self.is_blank() {
            CloseOutcome::Discarded
        } else {
            CloseOutcome::Committed
        }
    }
}
