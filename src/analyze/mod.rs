//! Content analyzer
//!
//! Produces the submitted [`Answer`]: sanitized markup, the plain text the
//! user sees (without editing chrome), and the number of screenshots.

use markup5ever_rcdom::{Handle, NodeData};

use crate::editor::Editor;
use crate::models::equation::is_equation_src;
use crate::models::Answer;
use crate::parse::html::{attr, parse_to_dom, tag_name};

/// Build the answer value for the editor's current content
pub fn analyze(editor: &mut Editor) -> Answer {
    let answer_text = editor.hide_chrome().text_content();
    let answer_html = editor.sanitizer().sanitize(&editor.content_html());
    let image_count = count_screenshots(&answer_html, &editor.config().equation_image_prefix);

    log::debug!(
        "Analyzed answer: {} chars of text, {} screenshots",
        answer_text.chars().count(),
        image_count
    );
    Answer {
        answer_html,
        answer_text,
        image_count,
    }
}

/// Number of `<img>` elements that are not equation artifacts
pub fn count_screenshots(html: &str, equation_prefix: &str) -> usize {
    let dom = parse_to_dom(&format!("<div>{}</div>", html));
    let mut counts = ImageCounts {
        prefix: equation_prefix,
        total: 0,
        equations: 0,
    };
    counts.walk(&dom.document);
    counts.total.saturating_sub(counts.equations)
}

struct ImageCounts<'a> {
    prefix: &'a str,
    total: usize,
    equations: usize,
}

impl ImageCounts<'_> {
    fn walk(&mut self, node: &Handle) {
        if let NodeData::Element { .. } = node.data {
            if tag_name(node).as_deref() == Some("img") {
                self.total += 1;
                if attr(node, "src").is_some_and(|src| is_equation_src(&src, self.prefix)) {
                    self.equations += 1;
                }
            }
        }
        for child in node.children.borrow().iter() {
            self.walk(child);
        }
    }
}
