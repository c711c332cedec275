//! Special characters offered by the toolbar
//!
//! Each entry is keyed by its LaTeX command. Entries with a Unicode form can
//! be typed straight into the answer text; the rest only make sense inside an
//! equation.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialCharacter {
    pub command: &'static str,
    pub character: Option<char>,
    /// Shown before the "show all" toggle is opened
    pub popular: bool,
}

const fn ch(command: &'static str, character: char, popular: bool) -> SpecialCharacter {
    SpecialCharacter {
        command,
        character: Some(character),
        popular,
    }
}

const fn cmd(command: &'static str, popular: bool) -> SpecialCharacter {
    SpecialCharacter {
        command,
        character: None,
        popular,
    }
}

pub const SPECIAL_CHARACTERS: &[SpecialCharacter] = &[
    // Greek
    ch("\\alpha", 'α', true),
    ch("\\beta", 'β', true),
    ch("\\gamma", 'γ', false),
    ch("\\delta", 'δ', false),
    ch("\\Delta", 'Δ', true),
    ch("\\varepsilon", 'ε', false),
    ch("\\eta", 'η', false),
    ch("\\theta", 'θ', false),
    ch("\\lambda", 'λ', false),
    ch("\\mu", 'μ', false),
    ch("\\pi", 'π', true),
    ch("\\rho", 'ρ', false),
    ch("\\sigma", 'σ', false),
    ch("\\Sigma", 'Σ', false),
    ch("\\varphi", 'φ', false),
    ch("\\omega", 'ω', false),
    ch("\\Omega", 'Ω', false),
    // Operators and relations
    ch("\\pm", '±', true),
    ch("\\cdot", '·', true),
    ch("\\times", '×', false),
    ch("\\div", '÷', false),
    ch("\\leq", '≤', true),
    ch("\\geq", '≥', true),
    ch("\\neq", '≠', true),
    ch("\\approx", '≈', true),
    ch("\\infty", '∞', true),
    ch("\\rightarrow", '→', true),
    ch("\\leftrightarrow", '↔', false),
    ch("\\Rightarrow", '⇒', false),
    ch("\\in", '∈', false),
    ch("\\notin", '∉', false),
    ch("\\subset", '⊂', false),
    ch("\\cup", '∪', false),
    ch("\\cap", '∩', false),
    ch("\\angle", '∠', false),
    ch("\\degree", '°', true),
    // Equation-only commands
    cmd("\\sqrt", true),
    cmd("\\frac", true),
    cmd("\\cos", false),
    cmd("\\sin", false),
    cmd("\\tan", false),
    cmd("\\int", false),
    cmd("\\sum", false),
    cmd("\\lim", false),
];

pub fn lookup(command: &str) -> Option<&'static SpecialCharacter> {
    SPECIAL_CHARACTERS.iter().find(|c| c.command == command)
}

pub fn popular() -> impl Iterator<Item = &'static SpecialCharacter> {
    SPECIAL_CHARACTERS.iter().filter(|c| c.popular)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_greek() {
        assert_eq!(lookup("\\alpha").and_then(|c| c.character), Some('α'));
        assert_eq!(lookup("\\delta").and_then(|c| c.character), Some('δ'));
    }

    #[test]
    fn test_equation_only_commands_have_no_character() {
        assert_eq!(lookup("\\sqrt").map(|c| c.character), Some(None));
        assert_eq!(lookup("\\cos").map(|c| c.character), Some(None));
    }

    #[test]
    fn test_unknown_command() {
        assert!(lookup("\\nope").is_none());
    }

    #[test]
    fn test_commands_are_unique() {
        for (i, a) in SPECIAL_CHARACTERS.iter().enumerate() {
            assert!(
                SPECIAL_CHARACTERS[i + 1..].iter().all(|b| b.command != a.command),
                "duplicate {}",
                a.command
            );
        }
    }

    #[test]
    fn test_popular_subset() {
        assert!(popular().any(|c| c.command == "\\alpha"));
        assert!(popular().all(|c| c.popular));
    }
}
