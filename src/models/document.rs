//! Answer document: a flat sequence of inlines plus the equation id counter

use serde::{Deserialize, Serialize};

use super::content::Inline;
use super::equation::{EquationId, EquationNode};
use crate::parse::ParsedInline;
use crate::text::TextRange;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    items: Vec<Inline>,
    /// Next index for `math-editor-N` ids; ids are never reused
    next_equation: u64,
}

impl Document {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_equation: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Inline] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Inline> {
        self.items.get(index)
    }

    pub fn allocate_equation_id(&mut self) -> EquationId {
        let index = self.next_equation.max(1);
        self.next_equation = index + 1;
        EquationId::from_index(index)
    }

    /// Turn parser output into inlines, giving each equation a fresh id
    pub fn materialize(&mut self, parsed: Vec<ParsedInline>, equation_prefix: &str) -> Vec<Inline> {
        parsed
            .into_iter()
            .map(|item| match item {
                ParsedInline::Char(ch) => Inline::Char(ch),
                ParsedInline::LineBreak => Inline::LineBreak,
                ParsedInline::Image { src, alt } => Inline::Image { src, alt },
                ParsedInline::Equation { latex } => {
                    let id = self.allocate_equation_id();
                    Inline::Equation(EquationNode::with_latex(id, &latex, equation_prefix))
                }
            })
            .collect()
    }

    /// Insert items at `at`, returning how many were inserted
    pub fn insert(&mut self, at: usize, items: Vec<Inline>) -> usize {
        let count = items.len();
        let at = at.min(self.items.len());
        self.items.splice(at..at, items);
        count
    }

    /// Remove and return the items in `range` (clamped to the document)
    pub fn remove_range(&mut self, range: TextRange) -> Vec<Inline> {
        let end = range.end.min(self.items.len());
        let start = range.start.min(end);
        self.items.drain(start..end).collect()
    }

    pub fn position_of(&self, id: &EquationId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.equation().is_some_and(|node| &node.id == id))
    }

    pub fn equation(&self, id: &EquationId) -> Option<&EquationNode> {
        self.position_of(id)
            .and_then(|pos| self.items[pos].equation())
    }

    pub fn equation_mut(&mut self, id: &EquationId) -> Option<&mut EquationNode> {
        let pos = self.position_of(id)?;
        self.items[pos].equation_mut()
    }

    /// Remove an equation node entirely, returning where it was
    pub fn remove_equation(&mut self, id: &EquationId) -> Option<(usize, EquationNode)> {
        let pos = self.position_of(id)?;
        match self.items.remove(pos) {
            Inline::Equation(node) => Some((pos, node)),
            _ => None,
        }
    }

    pub fn equations(&self) -> impl Iterator<Item = &EquationNode> {
        self.items.iter().filter_map(Inline::equation)
    }

    /// Plain-text projection: characters verbatim, breaks as newlines
    ///
    /// Images and equation artifacts carry no text.
    pub fn text_content(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                Inline::Char(ch) => Some(*ch),
                Inline::LineBreak => Some('\n'),
                Inline::Image { .. } | Inline::Equation(_) => None,
            })
            .collect()
    }

    /// Serialized (unsanitized) markup of the whole document
    pub fn to_html(&self, equation_prefix: &str) -> String {
        let mut out = String::new();
        for item in &self.items {
            item.write_html(&mut out, equation_prefix);
        }
        out
    }
}
