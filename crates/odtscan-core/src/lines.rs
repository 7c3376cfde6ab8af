//! Splits a body buffer into its top-level elements.
//!
//! Each top-level element is one "line" of the document, in reading order.
//! Text between elements (usually indentation whitespace) is skipped.
//!
//! # Performance
//!
//! - Zero-copy: lines borrow directly from the buffer
//! - SIMD-accelerated `<` scanning via `memchr`

use memchr::memchr;

use crate::scan::find_closing_tag_end;
use crate::span::Span;

/// A single top-level element with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The element's raw markup.
    pub text: &'a str,
    /// Byte span in the original buffer.
    pub span: Span,
    /// Set when the element never closed and the line runs to the end of
    /// the buffer.
    pub malformed: bool,
}

impl<'a> Line<'a> {
    /// Check if the line's raw markup contains `needle`.
    #[inline]
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

/// Iterator over the top-level elements of a buffer.
pub struct LineSplitter<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> LineSplitter<'a> {
    /// Create a splitter over the given buffer.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }
}

impl<'a> Iterator for LineSplitter<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        let bytes = self.input.as_bytes();
        if self.offset >= bytes.len() {
            return None;
        }
        let Some(rel) = memchr(b'<', &bytes[self.offset..]) else {
            self.offset = bytes.len();
            return None;
        };
        let start = self.offset + rel;

        match find_closing_tag_end(self.input, start + 1, bytes.len()) {
            Some(tag) => {
                self.offset = tag.end();
                Some(Line {
                    text: tag.outer.slice(self.input),
                    span: tag.outer,
                    malformed: false,
                })
            }
            None => {
                // Unterminated: keep the rest as one final line and stop.
                self.offset = bytes.len();
                log::warn!(
                    "unterminated element at byte {}; keeping {} trailing bytes as the last line",
                    start,
                    bytes.len() - start
                );
                Some(Line {
                    text: &self.input[start..],
                    span: Span::from_range(start, bytes.len()),
                    malformed: true,
                })
            }
        }
    }
}

/// Split `input` into the spans of its top-level elements.
pub fn split_lines(input: &str) -> Vec<Span> {
    LineSplitter::new(input).map(|line| line.span).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        LineSplitter::new(input).map(|l| l.text).collect()
    }

    #[test]
    fn test_skips_whitespace_between_elements() {
        let input = "  <text:p>a</text:p>\n  <text:p/>\n<text:h>b</text:h>  ";
        assert_eq!(
            texts(input),
            vec!["<text:p>a</text:p>", "<text:p/>", "<text:h>b</text:h>"]
        );
    }

    #[test]
    fn test_nested_elements_stay_in_their_line() {
        let input = "<text:list><text:list-item><text:p>x</text:p></text:list-item></text:list><text:p>y</text:p>";
        let lines: Vec<_> = LineSplitter::new(input).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("<text:p>x</text:p>"));
        assert_eq!(lines[1].text, "<text:p>y</text:p>");
    }

    #[test]
    fn test_malformed_tail_becomes_last_line() {
        let input = "<text:p>a</text:p><text:p>broken <text:p>c</text:p>";
        let lines: Vec<_> = LineSplitter::new(input).collect();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].malformed);
        assert!(lines[1].malformed);
        assert_eq!(lines[1].text, "<text:p>broken <text:p>c</text:p>");
    }

    #[test]
    fn test_empty_and_text_only() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("   plain text   ").is_empty());
    }

    #[test]
    fn test_spans_point_into_input() {
        let input = "\n<a>1</a>\n<b/>";
        let spans = split_lines(input);
        assert_eq!(spans, vec![Span::new(1, 9), Span::new(10, 14)]);
    }
}
