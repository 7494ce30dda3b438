//! Byte-addressed positions and ranges.
//!
//! All coordinates in this crate are byte offsets into a UTF-8 buffer.
//! `SourcePoint` columns are measured in bytes, consistent with what the
//! incremental parser expects, so a point and a byte offset derived from the
//! same buffer never disagree.

/// A (row, column) position where the column is a byte offset within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePoint {
    pub row: usize,
    pub column: usize,
}

impl SourcePoint {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl PartialOrd for SourcePoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourcePoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.row.cmp(&other.row) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            ord => ord,
        }
    }
}

/// A half-open byte range `[start, end)`.
///
/// The invariant `start <= end` holds for every constructed range; `new`
/// checks it in debug builds. Ranges are plain values and carry no reference
/// to the buffer they index, so validity against a particular buffer length
/// is the caller's concern at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "byte range start {start} exceeds end {end}");
        Self { start, end }
    }

    /// The number of bytes covered by the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `byte` falls inside the half-open range.
    pub fn contains(&self, byte: usize) -> bool {
        byte >= self.start && byte < self.end
    }

    /// The overlapping portion of two ranges, or `None` when they are
    /// disjoint. Touching ranges yield an empty range at the shared bound.
    pub fn intersection(&self, other: ByteRange) -> Option<ByteRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(ByteRange::new(start, end))
        } else {
            None
        }
    }

    /// The range translated by a signed byte delta, saturating at zero.
    pub fn shifted(&self, delta: isize) -> ByteRange {
        let shift = |value: usize| -> usize {
            if delta >= 0 {
                value.saturating_add(delta as usize)
            } else {
                value.saturating_sub(delta.unsigned_abs())
            }
        };
        ByteRange::new(shift(self.start), shift(self.end))
    }
}

impl From<std::ops::Range<usize>> for ByteRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        ByteRange::new(range.start, range.end)
    }
}

impl From<ByteRange> for std::ops::Range<usize> {
    fn from(range: ByteRange) -> Self {
        range.start..range.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_len_and_empty() {
        assert_eq!(ByteRange::new(3, 8).len(), 5);
        assert!(ByteRange::new(4, 4).is_empty());
        assert!(!ByteRange::new(4, 5).is_empty());
    }

    #[test]
    fn range_contains_is_half_open() {
        let range = ByteRange::new(2, 5);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }

    #[test]
    fn intersection_overlapping() {
        let a = ByteRange::new(0, 10);
        let b = ByteRange::new(5, 15);
        assert_eq!(a.intersection(b), Some(ByteRange::new(5, 10)));
    }

    #[test]
    fn intersection_touching_is_empty() {
        let a = ByteRange::new(0, 5);
        let b = ByteRange::new(5, 10);
        assert_eq!(a.intersection(b), Some(ByteRange::new(5, 5)));
    }

    #[test]
    fn intersection_disjoint() {
        let a = ByteRange::new(0, 4);
        let b = ByteRange::new(6, 10);
        assert_eq!(a.intersection(b), None);
    }

    #[test]
    fn shifted_positive_and_negative() {
        assert_eq!(ByteRange::new(10, 20).shifted(3), ByteRange::new(13, 23));
        assert_eq!(ByteRange::new(10, 20).shifted(-4), ByteRange::new(6, 16));
    }

    #[test]
    fn point_ordering_row_major() {
        assert!(SourcePoint::new(0, 9) < SourcePoint::new(1, 0));
        assert!(SourcePoint::new(2, 3) < SourcePoint::new(2, 4));
        assert_eq!(SourcePoint::new(1, 1), SourcePoint::new(1, 1));
    }
}
