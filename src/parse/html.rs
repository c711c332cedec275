//! HTML → inline conversion
//!
//! Used when loading saved answers and when pasting HTML. Input is expected
//! to be sanitized already; this pass only decides what each node becomes.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::models::equation::{is_equation_src, latex_from_src, ImageRef};

/// Inline content recovered from markup, before equation ids are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInline {
    Char(char),
    LineBreak,
    Image { src: ImageRef, alt: Option<String> },
    Equation { latex: String },
}

/// Elements that start on a new line when they follow other content
const BLOCK_TAGS: &[&str] = &["div", "p", "li", "h1", "h2", "h3", "h4", "h5", "h6", "pre"];

/// Elements whose content never becomes answer text
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "head", "title"];

pub fn parse_to_dom(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Children of `<body>`, or of the document when there is none
pub fn body_children(dom: &RcDom) -> Vec<Handle> {
    fn find_elem(node: &Handle, name: &str) -> Option<Handle> {
        if let NodeData::Element { name: q, .. } = &node.data {
            if (&*q.local).eq_ignore_ascii_case(name) {
                return Some(node.clone());
            }
        }
        node.children
            .borrow()
            .iter()
            .find_map(|child| find_elem(child, name))
    }

    match find_elem(&dom.document, "body") {
        Some(body) => body.children.borrow().clone(),
        None => dom.document.children.borrow().clone(),
    }
}

/// Lowercased tag name of an element node
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some((&*name.local).to_ascii_lowercase()),
        _ => None,
    }
}

/// Value of attribute `key` on an element node
pub fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (&*a.name.local).eq_ignore_ascii_case(key))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Convert markup into inlines
///
/// Runs of whitespace collapse to one space, as they render. Images without
/// a `src` are dropped.
pub fn parse_fragment(html: &str, equation_prefix: &str) -> Vec<ParsedInline> {
    let dom = parse_to_dom(html);
    let mut reader = InlineReader {
        equation_prefix,
        out: Vec::new(),
    };
    for child in body_children(&dom) {
        reader.walk(&child);
    }
    reader.out
}

struct InlineReader<'a> {
    equation_prefix: &'a str,
    out: Vec<ParsedInline>,
}

impl InlineReader<'_> {
    fn walk(&mut self, node: &Handle) {
        match &node.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                self.push_text(&text);
            }
            NodeData::Element { .. } => {
                let tag = tag_name(node).unwrap_or_default();
                match tag.as_str() {
                    "br" => self.out.push(ParsedInline::LineBreak),
                    "img" => self.push_image(node),
                    t if SKIPPED_TAGS.contains(&t) => {}
                    t => {
                        if BLOCK_TAGS.contains(&t) {
                            self.start_block();
                        }
                        for child in node.children.borrow().iter() {
                            self.walk(child);
                        }
                    }
                }
            }
            NodeData::Document => {
                for child in node.children.borrow().iter() {
                    self.walk(child);
                }
            }
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_ascii_whitespace() {
                if matches!(self.out.last(), Some(ParsedInline::Char(' '))) {
                    continue;
                }
                self.out.push(ParsedInline::Char(' '));
            } else {
                self.out.push(ParsedInline::Char(ch));
            }
        }
    }

    fn push_image(&mut self, node: &Handle) {
        let Some(src) = attr(node, "src").filter(|s| !s.trim().is_empty()) else {
            return;
        };

        let marked_svg = attr(node, "data-math-svg").is_some_and(|v| v == "true");
        if is_equation_src(&src, self.equation_prefix) || marked_svg {
            let latex = attr(node, "data-latex")
                .or_else(|| attr(node, "alt"))
                .or_else(|| latex_from_src(&src));
            if let Some(latex) = latex.filter(|l| !l.trim().is_empty()) {
                self.out.push(ParsedInline::Equation { latex });
                return;
            }
        }
        self.out.push(ParsedInline::Image {
            src: ImageRef::new(src),
            alt: attr(node, "alt"),
        });
    }

    fn start_block(&mut self) {
        if !self.out.is_empty() && !matches!(self.out.last(), Some(ParsedInline::LineBreak)) {
            self.out.push(ParsedInline::LineBreak);
        }
    }
}
