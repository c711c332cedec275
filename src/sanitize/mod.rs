//! Whitelist sanitizer for answer markup
//!
//! Absolute links to the page's own origin are made relative first, then
//! everything outside a fixed tag/attribute allow-list is dropped. Script and
//! style elements lose their content too. `data:` image sources survive only
//! for allowed raster types and SVG equation renderings.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use ammonia::Builder;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::EditorConfig;

/// Tags allowed in answer markup
pub const ALLOWED_TAGS: &[&str] = &[
    "b", "br", "div", "em", "i", "img", "p", "span", "strong", "sub", "sup", "u",
];

/// Attributes allowed on `<img>`
pub const ALLOWED_IMG_ATTRIBUTES: &[&str] = &["src", "alt", "data-latex", "data-math-svg"];

/// Classes allowed on `<span>` (the equation wrapper)
pub const ALLOWED_SPAN_CLASSES: &[&str] = &["math-editor-wrapper"];

/// URL schemes allowed in `src`
const ALLOWED_URL_SCHEMES: &[&str] = &["data", "http", "https"];

/// SVG data URIs are equation renderings, not screenshots
const SVG_MIME: &str = "image/svg+xml";

static DATA_URI_MIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)data:([a-z0-9.+-]+/[a-z0-9.+-]+)")
        .expect("DATA_URI_MIME: hardcoded regex is valid")
});

/// MIME type named by a `data:` URI, lowercased
pub fn data_uri_mime(src: &str) -> Option<String> {
    DATA_URI_MIME
        .captures(src.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitizer {
    origin: Option<String>,
    allowed_image_types: Vec<String>,
}

impl Sanitizer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            origin: config.normalized_origin().map(str::to_string),
            allowed_image_types: config
                .allowed_image_types
                .iter()
                .map(|mime| mime.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Sanitize raw markup; deterministic and idempotent
    pub fn sanitize(&self, raw_html: &str) -> String {
        let builder = self.builder();
        let mut clean = builder.clean(&self.relativize_links(raw_html)).to_string();
        // Entity-encoded self links only surface once the markup is parsed
        while self.contains_origin(&clean) {
            clean = builder.clean(&self.relativize_links(&clean)).to_string();
        }
        clean
    }

    /// Strip the page's own origin so self-links become relative paths
    ///
    /// Repeats until no occurrence is left, since removing one can join the
    /// text around it into another.
    pub fn relativize_links<'a>(&self, html: &'a str) -> Cow<'a, str> {
        let Some(origin) = self.origin.as_deref() else {
            return Cow::Borrowed(html);
        };
        if !html.contains(origin) {
            return Cow::Borrowed(html);
        }
        let mut relative = html.replace(origin, "");
        while relative.contains(origin) {
            relative = relative.replace(origin, "");
        }
        Cow::Owned(relative)
    }

    fn contains_origin(&self, html: &str) -> bool {
        self.origin.as_deref().is_some_and(|origin| html.contains(origin))
    }

    /// Whether an `<img src>` may be kept
    pub fn is_allowed_image_src(&self, src: &str) -> bool {
        match data_uri_mime(src) {
            Some(mime) => mime == SVG_MIME || self.allowed_image_types.contains(&mime),
            None => true,
        }
    }

    fn builder(&self) -> Builder<'static> {
        let tags: HashSet<&'static str> = ALLOWED_TAGS.iter().copied().collect();

        let mut tag_attributes = HashMap::new();
        tag_attributes.insert("img", ALLOWED_IMG_ATTRIBUTES.iter().copied().collect());

        let mut allowed_classes = HashMap::new();
        allowed_classes.insert("span", ALLOWED_SPAN_CLASSES.iter().copied().collect());

        let filter = self.clone();
        let mut builder = Builder::default();
        builder
            .tags(tags)
            .generic_attributes(HashSet::new())
            .tag_attributes(tag_attributes)
            .allowed_classes(allowed_classes)
            .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
            .attribute_filter(move |element, attribute, value| {
                if element == "img" && attribute == "src" && !filter.is_allowed_image_src(value) {
                    log::debug!("Dropping image source with disallowed type");
                    return None;
                }
                Some(value.into())
            });
        builder
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
