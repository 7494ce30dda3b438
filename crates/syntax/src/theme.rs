//! Theme mapping capture categories to styles.
//!
//! A [`SyntaxTheme`] maps tree-sitter capture names ("keyword", "string",
//! "function.method") to [`Style`] values. Lookups fall back through dot
//! prefixes, so "function.method.call" matches "function.method" and then
//! "function" before giving up, at which point the theme's default style
//! applies.

use lodestone_text::{Color, Style};
use std::collections::HashMap;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

/// A mapping from capture names to styles plus the default for unmatched
/// bytes. Consumed read-only per highlight call; swapping the theme on a
/// highlighter invalidates not-yet-redrawn lines but never touches text
/// that was already styled.
#[derive(Debug, Clone)]
pub struct SyntaxTheme {
    styles: HashMap<&'static str, Style>,
    default_style: Style,
}

impl SyntaxTheme {
    /// Builds a theme from (capture name, style) pairs.
    pub fn new(entries: &[(&'static str, Style)], default_style: Style) -> Self {
        Self {
            styles: entries.iter().copied().collect(),
            default_style,
        }
    }

    /// The built-in dark palette.
    pub fn default_dark() -> Self {
        let keyword = Style { fg: rgb(0xcb, 0xa6, 0xf7), ..Style::default() };
        let function = Style { fg: rgb(0x89, 0xb4, 0xfa), ..Style::default() };
        let ty = Style { fg: rgb(0xf9, 0xe2, 0xaf), ..Style::default() };
        let string = Style { fg: rgb(0xa6, 0xe3, 0xa1), ..Style::default() };
        let constant = Style { fg: rgb(0xfa, 0xb3, 0x87), ..Style::default() };
        let comment = Style { fg: rgb(0x6c, 0x70, 0x86), italic: true, ..Style::default() };
        let punctuation = Style { fg: rgb(0xa6, 0xad, 0xc8), ..Style::default() };
        let operator = Style { fg: rgb(0x89, 0xdc, 0xeb), ..Style::default() };
        let parameter = Style { fg: rgb(0xeb, 0xa0, 0xac), italic: true, ..Style::default() };
        let property = Style { fg: rgb(0xb4, 0xbe, 0xfe), ..Style::default() };
        let title = Style { fg: rgb(0xcb, 0xa6, 0xf7), bold: true, ..Style::default() };
        let uri = Style { fg: rgb(0x89, 0xb4, 0xfa), underline: true, ..Style::default() };

        Self::new(
            &[
                ("keyword", keyword),
                ("function", function),
                ("function.macro", keyword),
                ("constructor", function),
                ("type", ty),
                ("type.builtin", Style { italic: true, ..ty }),
                ("attribute", ty),
                ("string", string),
                ("escape", Style { fg: rgb(0xf5, 0xc2, 0xe7), ..Style::default() }),
                ("constant", constant),
                ("number", constant),
                ("comment", comment),
                ("punctuation", punctuation),
                ("operator", operator),
                ("variable.parameter", parameter),
                ("variable.builtin", Style { fg: rgb(0xf3, 0x8b, 0xa8), ..Style::default() }),
                ("property", property),
                ("label", Style { italic: true, ..operator }),
                ("text.title", title),
                ("text.literal", string),
                ("text.uri", uri),
            ],
            Style::default(),
        )
    }

    /// The style for unmatched bytes.
    pub fn default_style(&self) -> Style {
        self.default_style
    }

    /// Resolves a capture name to a style, falling back through dot
    /// prefixes. Returns `None` when neither the name nor any prefix is
    /// themed.
    pub fn style_for_capture(&self, name: &str) -> Option<Style> {
        if let Some(style) = self.styles.get(name) {
            return Some(*style);
        }
        let mut prefix = name;
        while let Some(dot) = prefix.rfind('.') {
            prefix = &prefix[..dot];
            if let Some(style) = self.styles.get(prefix) {
                return Some(*style);
            }
        }
        None
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self::default_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins() {
        let theme = SyntaxTheme::default_dark();
        let builtin = theme.style_for_capture("type.builtin").unwrap();
        let plain = theme.style_for_capture("type").unwrap();
        assert!(builtin.italic);
        assert!(!plain.italic);
    }

    #[test]
    fn prefix_fallback() {
        let theme = SyntaxTheme::default_dark();
        assert_eq!(
            theme.style_for_capture("function.method.call"),
            theme.style_for_capture("function"),
        );
        assert_eq!(
            theme.style_for_capture("punctuation.bracket"),
            theme.style_for_capture("punctuation"),
        );
    }

    #[test]
    fn unknown_capture_is_none() {
        let theme = SyntaxTheme::default_dark();
        assert!(theme.style_for_capture("nonexistent.capture").is_none());
    }

    #[test]
    fn comment_is_italic() {
        let theme = SyntaxTheme::default_dark();
        assert!(theme.style_for_capture("comment").unwrap().italic);
        assert!(theme.style_for_capture("comment.documentation").unwrap().italic);
    }

    #[test]
    fn default_style_is_plain() {
        let theme = SyntaxTheme::default_dark();
        assert_eq!(theme.default_style(), Style::default());
    }

    #[test]
    fn custom_theme_uses_given_default() {
        let default = Style { bold: true, ..Style::default() };
        let theme = SyntaxTheme::new(&[], default);
        assert_eq!(theme.default_style(), default);
        assert!(theme.style_for_capture("keyword").is_none());
    }
}
