//! Answer payload handed to the host application on save

use serde::{Deserialize, Serialize};

/// Serialized result of an editing session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Sanitized markup
    #[serde(rename = "answerHTML")]
    pub answer_html: String,

    /// Plain-text projection, without equation editor chrome
    pub answer_text: String,

    /// Raster images (screenshots), equation artifacts excluded
    pub image_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_field_names() {
        let answer = Answer {
            answer_html: "a<br>".to_string(),
            answer_text: "a\n".to_string(),
            image_count: 0,
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["answerHTML"], "a<br>");
        assert_eq!(json["answerText"], "a\n");
        assert_eq!(json["imageCount"], 0);
    }
}
