use crate::span::Span;
use std::fmt;

/// Error kinds for caller-facing read failures.
///
/// Structural ambiguity inside the scanner never produces one of these; an
/// unterminated tag is reported as `None` by the scan functions and recovered
/// locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadErrorKind {
    /// A line, table or row index past the end of what exists
    IndexOutOfRange,
    /// A row ran out of cells while strict table extraction was requested
    MissingCell,
}

/// A read error with an optional location in the markup buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    /// Human-readable error message
    pub message: String,
    /// Source location where the error occurred
    pub span: Option<Span>,
    /// Error categorization
    pub kind: ReadErrorKind,
}

impl ReadError {
    /// Create an error for an index past the end of a sequence of `len` items.
    pub fn index_out_of_range(what: &str, index: usize, len: usize) -> Self {
        Self {
            message: format!("{} index {} out of range (count is {})", what, index, len),
            span: None,
            kind: ReadErrorKind::IndexOutOfRange,
        }
    }

    /// Create an error for a row that has fewer cells than declared columns.
    pub fn missing_cell(row: usize, column: usize, span: Option<Span>) -> Self {
        Self {
            message: format!("missing cell in table: row {}, column {}", row, column),
            span,
            kind: ReadErrorKind::MissingCell,
        }
    }

    /// Attach a source location.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Check whether this is an out-of-range access.
    pub fn is_out_of_range(&self) -> bool {
        self.kind == ReadErrorKind::IndexOutOfRange
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at bytes {}..{}", span.start, span.end)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReadError {}
