//! Equation nodes and the equation artifact markup convention
//!
//! An equation artifact is an `<img>` whose `src` starts with a reserved
//! prefix (`/math.svg` by default) and carries the LaTeX source as the
//! URL-encoded `latex` query parameter. The same convention is what the
//! content analyzer and the paste handler use to tell equations from
//! ordinary images.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Default reserved path of the equation image service
pub const DEFAULT_EQUATION_IMAGE_PREFIX: &str = "/math.svg";

/// Stable identity of an equation node within one document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquationId(String);

impl EquationId {
    pub fn from_index(index: u64) -> Self {
        Self(format!("math-editor-{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EquationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EquationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Reference to an image resource (the `src` of an `<img>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// Image reference served by the equation image service for `latex`
    pub fn for_equation(prefix: &str, latex: &str) -> Self {
        let encoded: String = form_urlencoded::byte_serialize(latex.as_bytes()).collect();
        Self(format!("{}?latex={}", prefix, encoded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_equation_artifact(&self, prefix: &str) -> bool {
        is_equation_src(self.as_str(), prefix)
    }
}

/// One inline equation in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquationNode {
    pub id: EquationId,
    pub latex: String,
    pub rendered_image_ref: Option<ImageRef>,
}

impl EquationNode {
    /// Fresh node as created by "insert equation": no LaTeX, nothing rendered
    pub fn empty(id: EquationId) -> Self {
        Self {
            id,
            latex: String::new(),
            rendered_image_ref: None,
        }
    }

    pub fn with_latex(id: EquationId, latex: &str, prefix: &str) -> Self {
        let mut node = Self::empty(id);
        node.render(latex, prefix);
        node
    }

    /// Empty or whitespace-only LaTeX; such nodes never survive a close
    pub fn is_blank(&self) -> bool {
        self.latex.trim().is_empty()
    }

    /// Store `latex` and point the node at its image service rendering
    pub fn render(&mut self, latex: &str, prefix: &str) -> ImageRef {
        let image = ImageRef::for_equation(prefix, latex);
        self.latex = latex.to_string();
        self.rendered_image_ref = Some(image.clone());
        image
    }
}

/// True when `src` follows the equation artifact convention
pub fn is_equation_src(src: &str, prefix: &str) -> bool {
    src.starts_with(prefix)
}

/// Recover the LaTeX source from an equation artifact `src`
///
/// Quotes around the value (`latex="..."`) are tolerated.
pub fn latex_from_src(src: &str) -> Option<String> {
    let (_, query) = src.split_once('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "latex")
        .map(|(_, value)| trim_quotes(&value).to_string())
}

fn trim_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equation_ids_follow_wrapper_naming() {
        assert_eq!(EquationId::from_index(1).as_str(), "math-editor-1");
    }

    #[test]
    fn test_image_ref_encodes_latex() {
        let image = ImageRef::for_equation("/math.svg", "\\sqrt{1}");
        assert_eq!(image.as_str(), "/math.svg?latex=%5Csqrt%7B1%7D");
        assert!(image.is_equation_artifact("/math.svg"));
    }

    #[test]
    fn test_latex_survives_src() {
        let latex = "\\frac{a + b}{2} & x";
        let image = ImageRef::for_equation("/math.svg", latex);
        assert_eq!(latex_from_src(image.as_str()).as_deref(), Some(latex));
    }

    #[test]
    fn test_quoted_latex_parameter() {
        let src = "/math.svg?latex=\"x^2\"";
        assert_eq!(latex_from_src(src).as_deref(), Some("x^2"));
    }

    #[test]
    fn test_src_without_query_has_no_latex() {
        assert_eq!(latex_from_src("/math.svg"), None);
    }

    #[test]
    fn test_blank_detection() {
        let mut node = EquationNode::empty(EquationId::from_index(1));
        assert!(node.is_blank());
        node.latex = "  \t".to_string();
        assert!(node.is_blank());
        node.render("x", "/math.svg");
        assert!(!node.is_blank());
        assert!(node.rendered_image_ref.is_some());
    }
}
