//! Styles, attribute runs, and the mutable styled-text buffer.
//!
//! A [`StyledText`] owns a line's text plus a run list that is always
//! sorted, non-overlapping, and exactly covers the text. Highlighters write
//! attribute runs through [`StyledText::set_attributes`]; later writes
//! override earlier ones on the overlapped bytes, which is what gives
//! more-specific syntax captures priority over broader ones.

use crate::geometry::ByteRange;

/// A color contributed by a theme.
///
/// `Default` means "let the presentation layer decide"; the core never
/// resolves it to a concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

/// Text attributes applied to a run of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Bold weight. Affects rendered size, so applying it invalidates
    /// cached layout metrics.
    pub bold: bool,
    /// Italic slant. Also sizing-relevant.
    pub italic: bool,
    /// Single underline.
    pub underline: bool,
}

impl Style {
    /// Returns true if rendering this style can change glyph metrics
    /// relative to the regular font.
    pub fn affects_sizing(&self) -> bool {
        self.bold || self.italic
    }
}

/// Font configuration carried by highlighters.
///
/// The core treats this as opaque: it is stored, compared, and handed back,
/// never interpreted. Changing it invalidates previously computed runs for
/// lines that have not been redrawn; recomputing those is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSettings {
    pub family: String,
    pub point_size: u16,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            point_size: 14,
        }
    }
}

/// One attribute run: a byte range of the owning text with a uniform style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRun {
    pub range: ByteRange,
    pub style: Style,
}

impl StyleRun {
    pub fn new(range: ByteRange, style: Style) -> Self {
        Self { range, style }
    }
}

/// A mutable styled-text buffer.
///
/// Invariant: the run list is sorted by start, runs never overlap, and
/// their union is exactly `[0, text.len())`. Every mutation preserves this,
/// so consumers can walk the runs without gap handling.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    text: String,
    runs: Vec<StyleRun>,
}

impl StyledText {
    /// Creates a styled text with a single default-styled run.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![StyleRun::new(ByteRange::new(0, text.len()), Style::default())]
        };
        Self { text, runs }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte length of the text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The current attribute runs, sorted and covering the whole text.
    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// The style in effect at a byte offset, or `None` past the end.
    pub fn style_at(&self, byte: usize) -> Option<Style> {
        let idx = self.runs.partition_point(|run| run.range.end <= byte);
        let run = self.runs.get(idx)?;
        run.range.contains(byte).then_some(run.style)
    }

    /// Splices `style` over `range`, trimming and splitting overlapped runs.
    ///
    /// The range is clamped to the text; empty ranges are no-ops. Adjacent
    /// runs that end up with equal styles are merged, so repeated writes do
    /// not fragment the run list.
    pub fn set_attributes(&mut self, range: ByteRange, style: Style) {
        let clamped = ByteRange::new(range.start.min(self.text.len()), range.end.min(self.text.len()));
        if clamped.is_empty() {
            return;
        }

        let mut next = Vec::with_capacity(self.runs.len() + 2);
        let mut inserted = false;
        for run in self.runs.drain(..) {
            if run.range.end <= clamped.start {
                next.push(run);
                continue;
            }
            if !inserted {
                if run.range.start < clamped.start {
                    next.push(StyleRun::new(
                        ByteRange::new(run.range.start, clamped.start),
                        run.style,
                    ));
                }
                next.push(StyleRun::new(clamped, style));
                inserted = true;
            }
            if run.range.end > clamped.end {
                let tail_start = run.range.start.max(clamped.end);
                next.push(StyleRun::new(ByteRange::new(tail_start, run.range.end), run.style));
            }
        }
        if !inserted {
            next.push(StyleRun::new(clamped, style));
        }

        self.runs = merge_runs(next);
    }
}

/// Merges adjacent runs with equal styles.
fn merge_runs(runs: Vec<StyleRun>) -> Vec<StyleRun> {
    let mut result: Vec<StyleRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if let Some(last) = result.last_mut() {
            if last.style == run.style && last.range.end == run.range.start {
                last.range.end = run.range.end;
                continue;
            }
        }
        result.push(run);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bold() -> Style {
        Style {
            bold: true,
            ..Style::default()
        }
    }

    fn italic() -> Style {
        Style {
            italic: true,
            ..Style::default()
        }
    }

    /// Asserts the run-list invariant: sorted, non-overlapping, gap-free,
    /// covering the whole text.
    fn assert_covered(styled: &StyledText) {
        if styled.is_empty() {
            assert!(styled.runs().is_empty());
            return;
        }
        let mut cursor = 0;
        for run in styled.runs() {
            assert_eq!(run.range.start, cursor, "gap or overlap before {:?}", run);
            assert!(run.range.end > run.range.start, "empty run {:?}", run);
            cursor = run.range.end;
        }
        assert_eq!(cursor, styled.len(), "runs do not reach end of text");
    }

    #[test]
    fn new_has_single_default_run() {
        let styled = StyledText::new("hello");
        assert_eq!(styled.runs().len(), 1);
        assert_eq!(styled.runs()[0].range, ByteRange::new(0, 5));
        assert_eq!(styled.runs()[0].style, Style::default());
        assert_covered(&styled);
    }

    #[test]
    fn empty_text_has_no_runs() {
        let styled = StyledText::new("");
        assert!(styled.runs().is_empty());
    }

    #[test]
    fn set_attributes_splits_surrounding_run() {
        let mut styled = StyledText::new("hello world");
        styled.set_attributes(ByteRange::new(6, 11), bold());

        assert_eq!(styled.runs().len(), 2);
        assert_eq!(styled.runs()[0].range, ByteRange::new(0, 6));
        assert_eq!(styled.runs()[1].range, ByteRange::new(6, 11));
        assert!(styled.runs()[1].style.bold);
        assert_covered(&styled);
    }

    #[test]
    fn set_attributes_interior_splits_into_three() {
        let mut styled = StyledText::new("abcdefgh");
        styled.set_attributes(ByteRange::new(3, 5), italic());

        assert_eq!(styled.runs().len(), 3);
        assert_eq!(styled.runs()[1].range, ByteRange::new(3, 5));
        assert!(styled.runs()[1].style.italic);
        assert_covered(&styled);
    }

    #[test]
    fn later_write_overrides_overlap() {
        let mut styled = StyledText::new("abcdefgh");
        styled.set_attributes(ByteRange::new(0, 6), bold());
        styled.set_attributes(ByteRange::new(4, 8), italic());

        assert_eq!(styled.style_at(0), Some(bold()));
        assert_eq!(styled.style_at(3), Some(bold()));
        assert_eq!(styled.style_at(4), Some(italic()));
        assert_eq!(styled.style_at(7), Some(italic()));
        assert_covered(&styled);
    }

    #[test]
    fn equal_adjacent_runs_are_merged() {
        let mut styled = StyledText::new("abcdefgh");
        styled.set_attributes(ByteRange::new(0, 4), bold());
        styled.set_attributes(ByteRange::new(4, 8), bold());
        assert_eq!(styled.runs().len(), 1);
        assert_covered(&styled);
    }

    #[test]
    fn out_of_bounds_range_is_clamped() {
        let mut styled = StyledText::new("abc");
        styled.set_attributes(ByteRange::new(1, 100), bold());
        assert_eq!(styled.runs().last().unwrap().range, ByteRange::new(1, 3));
        assert_covered(&styled);
    }

    #[test]
    fn fully_out_of_bounds_range_is_noop() {
        let mut styled = StyledText::new("abc");
        let before = styled.clone();
        styled.set_attributes(ByteRange::new(5, 9), bold());
        assert_eq!(styled, before);
    }

    #[test]
    fn empty_range_is_noop() {
        let mut styled = StyledText::new("abc");
        let before = styled.clone();
        styled.set_attributes(ByteRange::new(1, 1), bold());
        assert_eq!(styled, before);
    }

    #[test]
    fn style_at_past_end_is_none() {
        let styled = StyledText::new("abc");
        assert_eq!(styled.style_at(3), None);
    }

    #[test]
    fn affects_sizing_for_bold_and_italic() {
        assert!(bold().affects_sizing());
        assert!(italic().affects_sizing());
        assert!(!Style::default().affects_sizing());
        assert!(!Style {
            underline: true,
            ..Style::default()
        }
        .affects_sizing());
    }

    proptest! {
        /// Run coverage stays total and non-overlapping under arbitrary
        /// attribute writes.
        #[test]
        fn coverage_invariant_holds(
            len in 1usize..64,
            writes in prop::collection::vec((0usize..64, 0usize..64, 0u8..4), 0..24),
        ) {
            let mut styled = StyledText::new("x".repeat(len));
            for (a, b, kind) in writes {
                let (start, end) = if a <= b { (a, b) } else { (b, a) };
                let style = match kind {
                    0 => Style::default(),
                    1 => bold(),
                    2 => italic(),
                    _ => Style { underline: true, ..Style::default() },
                };
                styled.set_attributes(ByteRange::new(start, end), style);
                assert_covered(&styled);
            }
        }
    }
}
