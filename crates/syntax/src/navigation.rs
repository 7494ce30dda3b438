//! Navigation between highlighted ranges.
//!
//! [`HighlightNavigationController`] walks an ordered list of highlighted
//! ranges (search results, matching-bracket pairs) relative to the current
//! selection. Each successful step moves `selected_range` to the
//! destination and notifies the delegate, so repeated calls walk the list
//! without the owner feeding the selection back in.

use lodestone_text::ByteRange;

/// How a navigation destination was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Plain forward or backward step.
    None,
    /// A backward step from the first range wrapped around to the last.
    PreviousWrappedToLast,
    /// A forward step from the last range wrapped around to the first.
    NextWrappedToFirst,
}

/// One range in the navigable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightedRange {
    pub range: ByteRange,
}

impl HighlightedRange {
    pub fn new(range: ByteRange) -> Self {
        Self { range }
    }
}

/// A navigation destination handed to the delegate: the target range, how
/// it was reached, and its index in the highlighted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightNavigationRange {
    pub range: ByteRange,
    pub loop_mode: LoopMode,
    pub index: usize,
}

impl HighlightNavigationRange {
    fn new(range: ByteRange, loop_mode: LoopMode, index: usize) -> Self {
        Self {
            range,
            loop_mode,
            index,
        }
    }
}

/// Receives navigation destinations. Implementors typically move the
/// selection to `destination.range` and scroll it into view.
pub trait HighlightNavigationDelegate {
    fn should_navigate_to(&mut self, destination: HighlightNavigationRange);
}

/// Steps through highlighted ranges relative to the current selection.
///
/// `highlighted_ranges` must be sorted by start offset and non-overlapping.
/// `selected_range` tracks the current selection: every successful step
/// updates it to the destination range before the delegate is notified,
/// and the owner overwrites it when the selection moves by other means.
/// With `loops_ranges` set, stepping past either end wraps around and the
/// destination's [`LoopMode`] says so.
pub struct HighlightNavigationController {
    delegate: Box<dyn HighlightNavigationDelegate>,
    pub highlighted_ranges: Vec<HighlightedRange>,
    pub selected_range: Option<ByteRange>,
    pub loops_ranges: bool,
}

impl HighlightNavigationController {
    pub fn new(delegate: Box<dyn HighlightNavigationDelegate>) -> Self {
        Self {
            delegate,
            highlighted_ranges: Vec::new(),
            selected_range: None,
            loops_ranges: false,
        }
    }

    /// Navigates to the first range starting at or after the selection's
    /// end. A range the caret sits inside is skipped, so repeated calls
    /// always make progress. Without a selection the first range is the
    /// destination. Past the last range: wraps when `loops_ranges` is set,
    /// otherwise does nothing.
    pub fn select_next_range(&mut self) {
        if self.highlighted_ranges.is_empty() {
            return;
        }
        let Some(selection) = self.selected_range else {
            self.navigate(0, LoopMode::None);
            return;
        };
        let next = self
            .highlighted_ranges
            .iter()
            .position(|highlighted| highlighted.range.start >= selection.end);
        match next {
            Some(index) => self.navigate(index, LoopMode::None),
            None if self.loops_ranges => self.navigate(0, LoopMode::NextWrappedToFirst),
            None => {}
        }
    }

    /// Navigates to the last range ending at or before the selection's
    /// start. Without a selection the last range is the destination.
    /// Before the first range: wraps when `loops_ranges` is set, otherwise
    /// does nothing.
    pub fn select_previous_range(&mut self) {
        if self.highlighted_ranges.is_empty() {
            return;
        }
        let last = self.highlighted_ranges.len() - 1;
        let Some(selection) = self.selected_range else {
            self.navigate(last, LoopMode::None);
            return;
        };
        let previous = self
            .highlighted_ranges
            .iter()
            .rposition(|highlighted| highlighted.range.end <= selection.start);
        match previous {
            Some(index) => self.navigate(index, LoopMode::None),
            None if self.loops_ranges => self.navigate(last, LoopMode::PreviousWrappedToLast),
            None => {}
        }
    }

    /// Navigates straight to the range at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds; passing a stale index is a
    /// caller bug, not a runtime condition to recover from.
    pub fn select_range(&mut self, index: usize) {
        let count = self.highlighted_ranges.len();
        assert!(
            index < count,
            "highlighted range index {index} out of bounds for {count} ranges"
        );
        self.navigate(index, LoopMode::None);
    }

    fn navigate(&mut self, index: usize, loop_mode: LoopMode) {
        let destination =
            HighlightNavigationRange::new(self.highlighted_ranges[index].range, loop_mode, index);
        self.selected_range = Some(destination.range);
        tracing::debug!(?destination, "navigating to highlighted range");
        self.delegate.should_navigate_to(destination);
    }
}
