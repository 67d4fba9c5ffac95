//! Styled display lines produced by renderers

use console::Style;
use std::fmt;

/// A run of text sharing one style
#[derive(Debug, Clone)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::new(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One line of renderer output
///
/// Lines are built span by span, the same way a prompt line reads left to
/// right: marker, name, then value or hint.
#[derive(Debug, Clone, Default)]
pub struct StyledLine {
    spans: Vec<Span>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unstyled text
    pub fn raw(mut self, text: impl Into<String>) -> Self {
        self.spans.push(Span::raw(text));
        self
    }

    /// Append text with a style
    pub fn styled(mut self, text: impl Into<String>, style: Style) -> Self {
        self.spans.push(Span::styled(text, style));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    /// Text without any styling
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Text with ANSI escapes, colored for a stderr-backed terminal
    pub fn to_ansi(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.style.clone().for_stderr().apply_to(&s.text).to_string())
            .collect()
    }
}

impl From<&str> for StyledLine {
    fn from(text: &str) -> Self {
        StyledLine::new().raw(text)
    }
}

impl From<String> for StyledLine {
    fn from(text: String) -> Self {
        StyledLine::new().raw(text)
    }
}

impl fmt::Display for StyledLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ansi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_joins_spans() {
        let line = StyledLine::new()
            .styled("?", Style::new().green().bold())
            .raw(" ")
            .styled("Name", Style::new().bold())
            .raw(" demo");
        assert_eq!(line.plain(), "? Name demo");
    }

    #[test]
    fn test_ansi_strips_back_to_plain() {
        let line = StyledLine::new()
            .styled("[Default x]", Style::new().blue().force_styling(true));
        let ansi = line.to_ansi();
        assert_eq!(console::strip_ansi_codes(&ansi), "[Default x]");
    }

    #[test]
    fn test_empty_line() {
        assert!(StyledLine::new().is_empty());
        assert!(StyledLine::new().raw("").is_empty());
        assert!(!StyledLine::from("x").is_empty());
    }
}
