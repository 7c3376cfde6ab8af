//! Byte ranges into the markup buffer.
//!
//! Scanning never copies the buffer. Every result is expressed as a `Span`
//! and only turned into text when a caller asks for it.

/// A half-open byte range `[start, end)` in the markup buffer.
///
/// All delimiters the scanner looks for are ASCII, so both ends of a span
/// produced by this crate always fall on UTF-8 char boundaries.
///
/// Offsets are `u32`, so buffers are limited to 4 GiB.
///
/// # Example
///
/// ```rust
/// use odtscan_core::span::Span;
///
/// let span = Span::new(3, 10);
/// assert_eq!(span.len(), 7);
/// assert_eq!(span.slice("<a>Hello World</a>"), "Hello W");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: u32,
    /// Ending byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from byte offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span from `usize` scanner positions.
    ///
    /// Positions must fit in `u32`; larger values are truncated in release
    /// builds.
    #[inline]
    pub(crate) fn from_range(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted span {}..{}", start, end);
        debug_assert!(end <= u32::MAX as usize, "offset {} exceeds 4 GiB", end);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// An empty span positioned at `at`.
    #[inline]
    pub const fn empty_at(at: u32) -> Self {
        Self { start: at, end: at }
    }

    /// Get the length of this span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this span contains a byte offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Merge two spans into one covering both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Borrow the text this span covers.
    ///
    /// Out-of-bounds or inverted spans yield an empty string instead of
    /// panicking.
    #[inline]
    pub fn slice<'a>(&self, buf: &'a str) -> &'a str {
        buf.get(self.start as usize..self.end as usize).unwrap_or("")
    }
}
