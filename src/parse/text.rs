//! Plain text → inline conversion
//!
//! Text is taken literally. Line feeds become line breaks and carriage
//! returns are dropped, so `\r\n` counts once.

use super::html::ParsedInline;

/// Characters of `text`, with `None` standing for a line break
pub fn text_units(text: &str) -> impl Iterator<Item = Option<char>> + '_ {
    text.chars()
        .filter(|ch| *ch != '\r')
        .map(|ch| (ch != '\n').then_some(ch))
}

pub fn parse_text(text: &str) -> Vec<ParsedInline> {
    text_units(text)
        .map(|unit| unit.map_or(ParsedInline::LineBreak, ParsedInline::Char))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_is_literal() {
        assert_eq!(
            parse_text("<b>"),
            vec![ParsedInline::Char('<'), ParsedInline::Char('b'), ParsedInline::Char('>')]
        );
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(
            text_units("a\r\nb\nc\r").collect::<Vec<_>>(),
            vec![Some('a'), None, Some('b'), None, Some('c')]
        );
    }
}
