//! Editor configuration supplied by the host page

use serde::{Deserialize, Serialize};

use super::equation::DEFAULT_EQUATION_IMAGE_PREFIX;
use super::errors::{EditorError, EditorResult};

/// Undo history cap per equation session
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Runtime configuration for one editor instance
///
/// The tag/attribute allow-list is a sanitizer constant and is not part of
/// this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Origin of the hosting page (e.g. `https://example.org`); absolute links
    /// to it are rewritten to relative ones on sanitize
    pub origin: Option<String>,

    /// Reserved path prefix identifying equation artifact images
    pub equation_image_prefix: String,

    /// Raster image MIME types accepted from the clipboard
    pub allowed_image_types: Vec<String>,

    /// Maximum number of undo steps kept per equation session
    pub history_limit: usize,

    /// Surround newly inserted equations with non-breaking spaces
    pub pad_equations: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            origin: None,
            equation_image_prefix: DEFAULT_EQUATION_IMAGE_PREFIX.to_string(),
            allowed_image_types: vec!["image/png".to_string(), "image/jpeg".to_string()],
            history_limit: DEFAULT_HISTORY_LIMIT,
            pad_equations: true,
        }
    }
}

impl EditorConfig {
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            ..Default::default()
        }
    }

    /// Reject configurations the editor cannot work with
    pub fn validate(&self) -> EditorResult<()> {
        if self.equation_image_prefix.trim().is_empty() {
            return Err(EditorError::InvalidConfig(
                "equation image prefix must not be empty".to_string(),
            ));
        }
        if self.history_limit == 0 {
            return Err(EditorError::InvalidConfig(
                "history limit must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self
            .allowed_image_types
            .iter()
            .find(|mime| !mime.to_ascii_lowercase().starts_with("image/"))
        {
            return Err(EditorError::InvalidConfig(format!(
                "allowed image type {} is not an image MIME type",
                bad
            )));
        }
        Ok(())
    }

    /// Check a MIME type against the allow-list, ignoring case and parameters
    pub fn is_allowed_image_type(&self, mime_type: &str) -> bool {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_image_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
    }

    /// Origin with any trailing slash removed, if one is configured
    pub fn normalized_origin(&self) -> Option<&str> {
        self.origin
            .as_deref()
            .map(|o| o.trim_end_matches('/'))
            .filter(|o| !o.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.equation_image_prefix, "/math.svg");
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_zero_history_limit_rejected() {
        let config = EditorConfig {
            history_limit: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EditorError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_image_mime_rejected() {
        let config = EditorConfig {
            allowed_image_types: vec!["text/html".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_image_type_matching_ignores_case_and_params() {
        let config = EditorConfig::default();
        assert!(config.is_allowed_image_type("image/png"));
        assert!(config.is_allowed_image_type("IMAGE/PNG; charset=binary"));
        assert!(!config.is_allowed_image_type("image/gif"));
    }

    #[test]
    fn test_deserialize_partial_camel_case() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"origin":"https://example.org/","historyLimit":5}"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.normalized_origin(), Some("https://example.org"));
        assert!(config.pad_equations);
    }
}
