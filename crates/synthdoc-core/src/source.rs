//! Source location tracking for document blocks.
//!
//! Every block in a [`Document`](crate::Document) remembers which input lines
//! produced it. Tables are the only blocks spanning more than one line.

/// A range of zero-based line numbers in the source text.
///
/// Ranges are half-open: `[start, end)`. A heading on the first line of the
/// input has the range `0..1`.
///
/// # Example
///
/// ```rust
/// use synthdoc_core::source::LineRange;
///
/// let range = LineRange::new(2, 5);
/// assert_eq!(range.len(), 3);
/// assert!(range.contains(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct LineRange {
    /// First line (inclusive).
    pub start: u32,
    /// Line after the last one (exclusive).
    pub end: u32,
}

impl LineRange {
    /// Create a new range from line numbers.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one line.
    ///
    /// At `u32::MAX` the end saturates, leaving an empty range.
    #[inline]
    pub const fn single(line: u32) -> Self {
        Self {
            start: line,
            end: line.saturating_add(1),
        }
    }

    /// Number of lines covered.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if this range covers no lines.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this range covers a line number.
    #[inline]
    pub const fn contains(&self, line: u32) -> bool {
        line >= self.start && line < self.end
    }

    /// Merge two ranges into one covering both.
    #[inline]
    pub fn merge(self, other: LineRange) -> LineRange {
        LineRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
