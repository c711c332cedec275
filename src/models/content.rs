//! Inline content items
//!
//! The document is a flat run of inlines. Equations are a single item, so
//! caret movement and deletion can never land inside one.

use serde::{Deserialize, Serialize};

use super::equation::{EquationNode, ImageRef};

/// Non-breaking space, used to pad equations
pub const NBSP: char = '\u{a0}';

/// One unit of answer content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Inline {
    Char(char),
    LineBreak,
    /// Raster image (screenshot)
    Image {
        src: ImageRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Equation(EquationNode),
}

impl Inline {
    pub fn equation(&self) -> Option<&EquationNode> {
        match self {
            Inline::Equation(node) => Some(node),
            _ => None,
        }
    }

    pub fn equation_mut(&mut self) -> Option<&mut EquationNode> {
        match self {
            Inline::Equation(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, Inline::LineBreak)
    }

    /// Serialized markup of this item
    ///
    /// Equations that have never been committed produce nothing.
    pub fn write_html(&self, out: &mut String, equation_prefix: &str) {
        match self {
            Inline::Char(ch) => push_escaped_char(out, *ch),
            Inline::LineBreak => out.push_str("<br>"),
            Inline::Image { src, alt } => {
                out.push_str("<img src=\"");
                push_escaped_attr(out, src.as_str());
                if let Some(alt) = alt {
                    out.push_str("\" alt=\"");
                    push_escaped_attr(out, alt);
                }
                out.push_str("\">");
            }
            Inline::Equation(node) => {
                if node.is_blank() {
                    return;
                }
                write_equation_img(out, node, equation_prefix);
            }
        }
    }
}

/// `<img>` markup of a committed equation artifact
pub fn write_equation_img(out: &mut String, node: &EquationNode, equation_prefix: &str) {
    let src = node
        .rendered_image_ref
        .clone()
        .unwrap_or_else(|| ImageRef::for_equation(equation_prefix, &node.latex));
    out.push_str("<img src=\"");
    push_escaped_attr(out, src.as_str());
    out.push_str("\" alt=\"");
    push_escaped_attr(out, &node.latex);
    out.push_str("\" data-latex=\"");
    push_escaped_attr(out, &node.latex);
    out.push_str("\">");
}

/// Escape text content the way the HTML serializer does
pub fn push_escaped_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        push_escaped_char(out, ch);
    }
}

fn push_escaped_char(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        NBSP => out.push_str("&nbsp;"),
        _ => out.push(ch),
    }
}

/// Escape a double-quoted attribute value
pub fn push_escaped_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            NBSP => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
