//! lodestone-syntax: incremental parsing and highlight navigation.
//!
//! This crate is the syntax engine behind a code editor's text view. It
//! keeps a tree-sitter syntax tree alive across edits, styles lines from
//! the tree either synchronously or on a background thread, and steps the
//! selection through highlighted ranges.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`IncrementalParser`]: owns a tree-sitter `Parser` and the latest
//!   `Tree`; ages the tree with [`TextEdit`]s and reparses from a snapshot
//!   or through a pull-based [`SourceAccessor`].
//!
//! - [`LineHighlighter`]: per-line styling over a [`StyledText`] buffer,
//!   implemented by [`TreeSitterHighlighter`] (tree-driven) and
//!   [`PlainTextHighlighter`] (no-op fallback). The async path delivers
//!   through a completion exactly once and never after `cancel()`.
//!
//! - [`HighlightNavigationController`]: walks an ordered list of
//!   highlighted ranges relative to the selection and notifies its
//!   delegate with each destination.
//!
//! - [`LanguageRegistry`] and [`SyntaxTheme`]: map file extensions to
//!   grammars and capture names to styles.
//!
//! # Example
//!
//! ```ignore
//! use lodestone_syntax::{IncrementalParser, LanguageRegistry, SyntaxTheme, TreeSitterHighlighter};
//! use lodestone_syntax::{HighlightInput, LineHighlighter};
//! use lodestone_text::{ByteRange, StyledText};
//!
//! let registry = LanguageRegistry::new();
//! let config = registry.config_for_extension("rs").unwrap();
//!
//! let mut parser = IncrementalParser::new();
//! parser.set_language(&config.language)?;
//! let source = "fn main() {}";
//! parser.parse_str(source);
//!
//! let mut highlighter = TreeSitterHighlighter::new(config, SyntaxTheme::default_dark())?;
//! highlighter.update(parser.latest_tree().unwrap().clone(), source);
//!
//! let mut line = StyledText::new(source);
//! highlighter.highlight(HighlightInput {
//!     text: &mut line,
//!     byte_range: ByteRange::new(0, source.len()),
//! });
//! ```

mod edit;
mod highlighter;
mod navigation;
mod parser;
mod registry;
mod theme;

pub use edit::{byte_offset_to_point, point_to_byte_offset, TextEdit};
pub use highlighter::{
    AsyncHighlight, HighlightCompletion, HighlightError, HighlightInput, HighlightResult,
    HighlighterError, LineHighlighter, PlainTextHighlighter, TreeSitterHighlighter,
};
pub use navigation::{
    HighlightNavigationController, HighlightNavigationDelegate, HighlightNavigationRange,
    HighlightedRange, LoopMode,
};
pub use parser::{IncrementalParser, SourceAccessor};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use theme::SyntaxTheme;

pub use tree_sitter::{Language, LanguageError, Tree};
