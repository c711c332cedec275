//! Clipboard payload classification and conversion
//!
//! A paste can offer several representations at once. HTML wins, then a
//! raster image, then plain text. Whatever is chosen is turned into parsed
//! inlines here; the editor decides where they go.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::models::{EditorConfig, EditorError, EditorResult, ImageRef};
use crate::parse::{parse_fragment, parse_text, ParsedInline};
use crate::sanitize::Sanitizer;

/// One representation offered by the clipboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardItem {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime_type: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: data.into(),
        }
    }
}

/// A classified paste
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClipboardPayload {
    Text { text: String },
    Html { html: String },
    Image { mime_type: String, data: Vec<u8> },
}

impl ClipboardPayload {
    pub fn text(text: &str) -> Self {
        ClipboardPayload::Text {
            text: text.to_string(),
        }
    }

    pub fn html(html: &str) -> Self {
        ClipboardPayload::Html {
            html: html.to_string(),
        }
    }

    pub fn image(mime_type: &str, data: impl Into<Vec<u8>>) -> Self {
        ClipboardPayload::Image {
            mime_type: mime_type.to_string(),
            data: data.into(),
        }
    }

    /// Pick the representation to paste: HTML, then image, then text
    pub fn classify(items: &[ClipboardItem]) -> Option<Self> {
        if let Some(item) = find_item(items, "text/html") {
            return Some(ClipboardPayload::Html {
                html: String::from_utf8_lossy(&item.data).into_owned(),
            });
        }
        if let Some(item) = find_item(items, "image/") {
            return Some(ClipboardPayload::Image {
                mime_type: item.mime_type.clone(),
                data: item.data.clone(),
            });
        }
        if let Some(item) = find_item(items, "text/plain") {
            return Some(ClipboardPayload::Text {
                text: String::from_utf8_lossy(&item.data).into_owned(),
            });
        }
        None
    }
}

fn find_item<'a>(items: &'a [ClipboardItem], mime_prefix: &str) -> Option<&'a ClipboardItem> {
    items
        .iter()
        .find(|item| item.mime_type.to_ascii_lowercase().starts_with(mime_prefix))
}

/// What pasting produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PasteOutcome {
    Inserted { count: usize },
    Rejected { mime_type: String },
}

/// Convert a payload into parsed inlines, or the MIME type that was refused
pub fn payload_to_inlines(
    payload: &ClipboardPayload,
    config: &EditorConfig,
    sanitizer: &Sanitizer,
) -> EditorResult<Result<Vec<ParsedInline>, String>> {
    match payload {
        ClipboardPayload::Html { html } => {
            let clean = sanitizer.sanitize(html);
            Ok(Ok(parse_fragment(&clean, &config.equation_image_prefix)))
        }
        ClipboardPayload::Text { text } => Ok(Ok(parse_text(text))),
        ClipboardPayload::Image { mime_type, data } => {
            if !config.is_allowed_image_type(mime_type) {
                return Ok(Err(mime_type.clone()));
            }
            if data.is_empty() {
                return Err(EditorError::ClipboardDecode(format!(
                    "empty {} payload",
                    mime_type
                )));
            }
            let data_uri = format!("data:{};base64,{}", mime_essence(mime_type), BASE64.encode(data));
            Ok(Ok(vec![ParsedInline::Image {
                src: ImageRef::new(data_uri),
                alt: None,
            }]))
        }
    }
}

fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
