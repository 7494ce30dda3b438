//! Incremental parser owning the current syntax tree.
//!
//! [`IncrementalParser`] wraps a `tree_sitter::Parser` plus the latest
//! [`Tree`]. Callers feed it [`TextEdit`]s to age the tree in place, then
//! reparse either from a string snapshot or by pulling byte chunks from a
//! [`SourceAccessor`] so large buffers are never materialized.
//!
//! The native parser and tree handles are released deterministically when
//! the parser is dropped; nothing here relies on a collector.

use crate::edit::TextEdit;
use lodestone_text::SourcePoint;
use std::time::Instant;
use tree_sitter::{Language, LanguageError, Tree};

/// Pull-based source access.
///
/// Given a byte index and the corresponding point, an accessor returns the
/// UTF-8 fragment starting there, or `None` at end of input. Fragments may
/// be arbitrarily short; the parser retries at whatever offset it needs
/// next, so accessors can be stateless. Fragments must not split a
/// multibyte sequence in a way the next read cannot resume.
pub trait SourceAccessor {
    fn chunk_at(&self, byte_index: usize, point: SourcePoint) -> Option<&[u8]>;
}

/// Whole-string accessor: every read returns the remainder of the string.
impl SourceAccessor for str {
    fn chunk_at(&self, byte_index: usize, _point: SourcePoint) -> Option<&[u8]> {
        self.as_bytes().get(byte_index..)
    }
}

/// An incremental parser that owns its syntax tree.
///
/// The held tree is the "previous tree" hint for the next parse. It is
/// exposed read-only through [`latest_tree`](Self::latest_tree); consumers
/// may clone the handle (cheap, refcounted) but only the parser ages it.
///
/// Operations on one instance must not run concurrently; exclusive access
/// is the caller's responsibility.
pub struct IncrementalParser {
    parser: tree_sitter::Parser,
    latest_tree: Option<Tree>,
}

impl IncrementalParser {
    pub fn new() -> Self {
        Self {
            parser: tree_sitter::Parser::new(),
            latest_tree: None,
        }
    }

    /// Swaps the active grammar.
    ///
    /// The previous tree is *not* discarded: it no longer derives from the
    /// active grammar, so callers must reparse immediately and should call
    /// [`discard_tree`](Self::discard_tree) first unless they deliberately
    /// want the stale tree around during the swap.
    pub fn set_language(&mut self, language: &Language) -> Result<(), LanguageError> {
        self.parser.set_language(language)
    }

    /// Parses from a complete source snapshot.
    ///
    /// Uses the previous tree as the incremental hint and replaces it on
    /// success. Returns `false` when no tree was produced (no grammar set,
    /// malformed input); the previous tree is retained in that case and
    /// should be treated as a stale parse, not an error.
    pub fn parse_str(&mut self, source: &str) -> bool {
        let started = Instant::now();
        match self.parser.parse(source, self.latest_tree.as_ref()) {
            Some(tree) => {
                tracing::debug!(bytes = source.len(), elapsed = ?started.elapsed(), "parsed snapshot");
                self.latest_tree = Some(tree);
                true
            }
            None => {
                tracing::warn!("snapshot parse produced no tree; previous tree retained");
                false
            }
        }
    }

    /// Parses by pulling byte chunks from `accessor`.
    ///
    /// This is the required mode for large buffers: the source is read in
    /// fragments at whatever offsets the parser requests and never
    /// materialized as one block. An accessor signalling end of input
    /// (empty or `None` fragment) terminates the parse cleanly.
    ///
    /// Accepts unsized accessors, so a plain `&str` or a trait object
    /// works directly.
    pub fn parse_with<A: SourceAccessor + ?Sized>(&mut self, accessor: &A) -> bool {
        let started = Instant::now();
        let mut read = |byte_index: usize, point: tree_sitter::Point| -> &[u8] {
            accessor
                .chunk_at(byte_index, SourcePoint::new(point.row, point.column))
                .unwrap_or(&[])
        };
        match self.parser.parse_with(&mut read, self.latest_tree.as_ref()) {
            Some(tree) => {
                tracing::debug!(elapsed = ?started.elapsed(), "parsed via accessor");
                self.latest_tree = Some(tree);
                true
            }
            None => {
                tracing::warn!("accessor parse produced no tree; previous tree retained");
                false
            }
        }
    }

    /// Ages the current tree in place to reflect `edit`, letting the next
    /// parse reuse unaffected subtrees.
    ///
    /// Returns `false` when no tree exists yet; that is "nothing to age",
    /// a legitimate state during initial load, not an error. Edits must
    /// arrive in the order they occurred in the buffer.
    pub fn apply_edit(&mut self, edit: &TextEdit) -> bool {
        match &mut self.latest_tree {
            Some(tree) => {
                tree.edit(&edit.to_input_edit());
                true
            }
            None => false,
        }
    }

    /// The tree from the most recent successful parse, if any.
    pub fn latest_tree(&self) -> Option<&Tree> {
        self.latest_tree.as_ref()
    }

    /// Drops the held tree so the next parse starts from scratch.
    ///
    /// Call this when swapping grammars to avoid reusing a tree that no
    /// longer derives from the active language.
    pub fn discard_tree(&mut self) {
        self.latest_tree = None;
    }
}

impl Default for IncrementalParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_text::SourcePoint;

    /// Accessor that serves the source in fixed-size fragments.
    struct ChunkedSource<'a> {
        text: &'a str,
        chunk: usize,
    }

    impl SourceAccessor for ChunkedSource<'_> {
        fn chunk_at(&self, byte_index: usize, _point: SourcePoint) -> Option<&[u8]> {
            let bytes = self.text.as_bytes();
            if byte_index >= bytes.len() {
                return None;
            }
            let end = (byte_index + self.chunk).min(bytes.len());
            Some(&bytes[byte_index..end])
        }
    }

    fn rust_parser() -> IncrementalParser {
        let mut parser = IncrementalParser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .expect("language should be compatible");
        parser
    }

    fn sexp(parser: &IncrementalParser) -> String {
        parser.latest_tree().unwrap().root_node().to_sexp()
    }

    #[test]
    fn parse_without_language_produces_no_tree() {
        let mut parser = IncrementalParser::new();
        assert!(!parser.parse_str("fn main() {}"));
        assert!(parser.latest_tree().is_none());
    }

    #[test]
    fn parse_str_produces_tree() {
        let mut parser = rust_parser();
        assert!(parser.parse_str("fn main() {}"));
        let tree = parser.latest_tree().unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
    }

    #[test]
    fn apply_edit_without_tree_is_noop() {
        let mut parser = rust_parser();
        let edit = TextEdit::insert("", SourcePoint::new(0, 0), "x");
        assert!(!parser.apply_edit(&edit));
    }

    #[test]
    fn pull_mode_parse_matches_snapshot_parse() {
        let source = "fn alpha() { let x = 1; }\nfn beta() { let y = 2; }\n";

        let mut snapshot = rust_parser();
        assert!(snapshot.parse_str(source));

        for chunk in [1, 3, 7, 1024] {
            let mut pulled = rust_parser();
            assert!(pulled.parse_with(&ChunkedSource { text: source, chunk }));
            assert_eq!(sexp(&pulled), sexp(&snapshot), "chunk size {chunk}");
        }
    }

    #[test]
    fn whole_str_accessor_works() {
        let source = "fn main() {}";
        let mut parser = rust_parser();
        assert!(parser.parse_with(source));
        assert_eq!(parser.latest_tree().unwrap().root_node().kind(), "source_file");
    }

    #[test]
    fn accessor_works_as_a_trait_object() {
        let source = "fn main() {}";
        let accessor: &dyn SourceAccessor = &ChunkedSource { text: source, chunk: 4 };
        let mut parser = rust_parser();
        assert!(parser.parse_with(accessor));
        assert_eq!(parser.latest_tree().unwrap().root_node().kind(), "source_file");
    }

    #[test]
    fn edit_then_reparse_matches_scratch_parse() {
        let before = "fn main() { let x = 1; }";
        let after = "fn main() { let xyz = 1; }";

        let mut incremental = rust_parser();
        assert!(incremental.parse_str(before));
        let edit = TextEdit::insert(before, SourcePoint::new(0, 17), "yz");
        assert!(incremental.apply_edit(&edit));
        assert!(incremental.parse_str(after));

        let mut scratch = rust_parser();
        assert!(scratch.parse_str(after));

        assert_eq!(sexp(&incremental), sexp(&scratch));
    }

    #[test]
    fn edit_sequence_in_buffer_order_matches_scratch() {
        let v0 = "fn a() {}\n";
        let v1 = "fn ab() {}\n";
        let v2 = "fn ab() {}\nfn c() {}\n";

        let mut parser = rust_parser();
        assert!(parser.parse_str(v0));

        let edit1 = TextEdit::insert(v0, SourcePoint::new(0, 4), "b");
        assert!(parser.apply_edit(&edit1));
        assert!(parser.parse_str(v1));

        let edit2 = TextEdit::insert(v1, SourcePoint::new(1, 0), "fn c() {}\n");
        assert!(parser.apply_edit(&edit2));
        assert!(parser.parse_str(v2));

        let mut scratch = rust_parser();
        assert!(scratch.parse_str(v2));
        assert_eq!(sexp(&parser), sexp(&scratch));
    }

    #[test]
    fn nodes_after_insert_shift_by_edit_delta() {
        let before = "fn a() {}\nfn b() {}\n";
        let mut parser = rust_parser();
        assert!(parser.parse_str(before));

        let second_fn = parser.latest_tree().unwrap().root_node().child(1).unwrap();
        assert_eq!(second_fn.start_byte(), 10);

        // Insert 3 bytes at offset 10; everything after shifts by +3.
        let edit = TextEdit::insert(before, SourcePoint::new(1, 0), "   ");
        assert!(parser.apply_edit(&edit));
        let after = "fn a() {}\n   fn b() {}\n";
        assert!(parser.parse_str(after));

        let second_fn = parser.latest_tree().unwrap().root_node().child(1).unwrap();
        assert_eq!(second_fn.start_byte(), 13);
    }

    #[test]
    fn set_language_retains_previous_tree() {
        let mut parser = rust_parser();
        assert!(parser.parse_str("fn main() {}"));
        parser
            .set_language(&tree_sitter_json::LANGUAGE.into())
            .expect("language should be compatible");
        // Stale tree survives the swap; discarding is the caller's call.
        assert!(parser.latest_tree().is_some());
        parser.discard_tree();
        assert!(parser.latest_tree().is_none());
    }

    #[test]
    fn failed_parse_retains_previous_tree() {
        let mut parser = rust_parser();
        assert!(parser.parse_str("fn main() {}"));
        let before = sexp(&parser);

        // An accessor that reports end of input immediately parses an empty
        // buffer, which still succeeds; forcing failure requires unsetting
        // the language path, covered above. Here we check the empty-input
        // terminate-cleanly contract instead.
        struct Empty;
        impl SourceAccessor for Empty {
            fn chunk_at(&self, _byte_index: usize, _point: SourcePoint) -> Option<&[u8]> {
                None
            }
        }
        let mut empty_parser = rust_parser();
        assert!(empty_parser.parse_with(&Empty));
        assert_eq!(
            empty_parser.latest_tree().unwrap().root_node().byte_range(),
            0..0
        );

        // And the original parser still holds its tree untouched.
        assert_eq!(sexp(&parser), before);
    }
}
