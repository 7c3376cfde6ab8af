//! Read-side query API over a document body.
//!
//! A [`Document`] owns the body markup and remembers its split into lines.
//! The split is recomputed lazily the first time a query runs after the
//! content changed. Change detection uses a revision counter bumped by every
//! mutation, so replacing the content with different markup of the same
//! length still invalidates the cached lines.
//!
//! The cache lives behind a `RefCell` so queries take `&self`. A `Document`
//! is meant for a single owner and is not `Sync`.

use std::borrow::Cow;
use std::cell::RefCell;

use memchr::memmem;

use crate::body::office_text;
use crate::error::ReadError;
use crate::lines::split_lines;
use crate::scan::starts_with_tag;
use crate::span::Span;
use crate::table::{extract_table, Table, TableOptions, TABLE};
use crate::text::plain_text;

/// Line spans computed for one revision of the content.
#[derive(Debug)]
struct LineCache {
    revision: u64,
    spans: Vec<Span>,
}

impl LineCache {
    fn build(content: &str, revision: u64) -> Self {
        let spans = split_lines(content);
        log::debug!(
            "split {} bytes into {} lines (revision {})",
            content.len(),
            spans.len(),
            revision
        );
        Self { revision, spans }
    }
}

/// A document body session.
///
/// # Example
///
/// ```rust
/// use odtscan_core::Document;
///
/// let doc = Document::new("<text:p>Audio:<text:span>http://example.org/</text:span></text:p>");
/// let line = doc.line_index_of("Audio:", 0).unwrap();
/// assert_eq!(doc.plain_line(line).unwrap(), "Audio:http://example.org/");
/// ```
#[derive(Debug, Default)]
pub struct Document {
    content: String,
    revision: u64,
    cache: RefCell<Option<LineCache>>,
}

impl Document {
    /// Create a session over a bare body fragment.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            revision: 0,
            cache: RefCell::new(None),
        }
    }

    /// Create a session from a full `content.xml`.
    ///
    /// Uses the inner markup of `office:text` when present and the whole
    /// input otherwise.
    pub fn from_content_xml(xml: &str) -> Self {
        match office_text(xml) {
            Some(body) => Self::new(body),
            None => {
                log::debug!("no office:text element; using the whole input as body");
                Self::new(xml)
            }
        }
    }

    /// The body markup.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Revision counter, bumped on every mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the body markup.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.revision += 1;
    }

    /// Append markup to the end of the body.
    pub fn push_markup(&mut self, markup: &str) {
        self.content.push_str(markup);
        self.revision += 1;
    }

    fn with_lines<R>(&self, f: impl FnOnce(&[Span]) -> R) -> R {
        let stale = self
            .cache
            .borrow()
            .as_ref()
            .map_or(true, |c| c.revision != self.revision);
        if stale {
            *self.cache.borrow_mut() = Some(LineCache::build(&self.content, self.revision));
        }
        let cache = self.cache.borrow();
        let spans: &[Span] = match cache.as_ref() {
            Some(c) => &c.spans,
            None => &[],
        };
        f(spans)
    }

    fn line_span(&self, index: usize) -> Result<Span, ReadError> {
        self.with_lines(|spans| {
            spans
                .get(index)
                .copied()
                .ok_or_else(|| ReadError::index_out_of_range("line", index, spans.len()))
        })
    }

    /// Spans of all lines, in document order.
    pub fn line_spans(&self) -> Vec<Span> {
        self.with_lines(|spans| spans.to_vec())
    }

    /// Raw markup of all lines, in document order.
    pub fn raw_lines(&self) -> Vec<&str> {
        self.line_spans()
            .into_iter()
            .map(|span| span.slice(&self.content))
            .collect()
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.with_lines(|spans| spans.len())
    }

    /// Raw markup of line `index`.
    pub fn raw_line(&self, index: usize) -> Result<&str, ReadError> {
        Ok(self.line_span(index)?.slice(&self.content))
    }

    /// Plain text of line `index`, with all markup removed.
    pub fn plain_line(&self, index: usize) -> Result<Cow<'_, str>, ReadError> {
        self.raw_line(index).map(plain_text)
    }

    /// Index of the first line at or after `start` whose raw markup contains
    /// `needle`. The match is a case-sensitive literal substring search.
    pub fn line_index_of(&self, needle: &str, start: usize) -> Option<usize> {
        let finder = memmem::Finder::new(needle.as_bytes());
        self.with_lines(|spans| {
            spans
                .iter()
                .enumerate()
                .skip(start)
                .find(|(_, span)| finder.find(span.slice(&self.content).as_bytes()).is_some())
                .map(|(i, _)| i)
        })
    }

    fn table_span(&self, index: usize) -> Option<Span> {
        self.with_lines(|spans| {
            spans
                .iter()
                .filter(|span| starts_with_tag(span.slice(&self.content), TABLE))
                .nth(index)
                .copied()
        })
    }

    /// Get the number of top-level tables.
    pub fn table_count(&self) -> usize {
        self.with_lines(|spans| {
            spans
                .iter()
                .filter(|span| starts_with_tag(span.slice(&self.content), TABLE))
                .count()
        })
    }

    /// Raw markup of the `index`-th top-level table.
    pub fn raw_table(&self, index: usize) -> Option<&str> {
        self.table_span(index).map(|span| span.slice(&self.content))
    }

    /// Extract the `index`-th top-level table.
    pub fn table(&self, index: usize, options: TableOptions) -> Result<Table<'_>, ReadError> {
        let span = self
            .table_span(index)
            .ok_or_else(|| ReadError::index_out_of_range("table", index, self.table_count()))?;
        let offset = span.start;
        let mut table = extract_table(span.slice(&self.content), options).map_err(|e| match e.span {
            Some(s) => e.with_span(shift(s, offset)),
            None => e,
        })?;
        table.span = table.span.map(|s| shift(s, offset));
        for column in &mut table.columns {
            column.span = shift(column.span, offset);
        }
        for row in &mut table.rows {
            row.span = shift(row.span, offset);
        }
        Ok(table)
    }
}

/// Move a span found in a line so it points into the whole body.
#[inline]
fn shift(span: Span, offset: u32) -> Span {
    Span::new(span.start + offset, span.end + offset)
}

impl From<String> for Document {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<&str> for Document {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}
