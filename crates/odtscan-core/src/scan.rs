//! Tag boundary detection over a flat markup buffer.
//!
//! No tree is built. An element's extent is resolved by counting opening and
//! closing occurrences of its own name, which handles same-named nesting
//! without knowing anything about the vocabulary.
//!
//! # Performance
//!
//! - Substring search via `memchr::memmem` (SIMD on supported platforms)
//! - No allocation: tag names are borrowed from the buffer
//! - Every search is bounded, so unterminated input degrades to `None`
//!   instead of scanning past the caller's region

use memchr::{memchr, memmem};

use crate::span::Span;

/// The extent of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan {
    /// From the opening `<` to just past the closing tag (or past `/>`).
    pub outer: Span,
    /// Content between the opening tag's `>` and the closing tag.
    /// Empty and positioned just past `>` for self-closing tags.
    pub inner: Span,
    /// Whether the element was written as `<name .../>`.
    pub self_closing: bool,
}

impl TagSpan {
    /// Byte offset just past the element, where scanning resumes.
    #[inline]
    pub fn end(&self) -> usize {
        self.outer.end as usize
    }
}

#[inline(always)]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Bytes that may follow a tag name in an opening tag.
#[inline(always)]
fn is_name_end(b: u8) -> bool {
    is_space(b) || b == b'>' || b == b'/'
}

/// Index of the first whitespace or `>` at or after `pos`, or `buf.len()`.
#[inline]
pub fn word_end(buf: &str, pos: usize) -> usize {
    let bytes = buf.as_bytes();
    let start = pos.min(bytes.len());
    bytes[start..]
        .iter()
        .position(|&b| is_space(b) || b == b'>')
        .map_or(bytes.len(), |i| start + i)
}

/// Find `prefix` + `name` inside `[from, boundary)` where the byte after the
/// name satisfies `follows`. Returns the position of the prefix.
fn find_delimited(
    bytes: &[u8],
    finder: &memmem::Finder<'_>,
    prefix: &[u8],
    from: usize,
    boundary: usize,
    follows: impl Fn(u8) -> bool,
) -> Option<usize> {
    let name_len = finder.needle().len();
    let mut at = from + prefix.len();
    while at < boundary {
        let found = at + finder.find(&bytes[at..boundary])?;
        let start = found - prefix.len();
        let after = found + name_len;
        if &bytes[start..found] == prefix && after < boundary && follows(bytes[after]) {
            return Some(start);
        }
        at = found + 1;
    }
    None
}

/// Find the next `<name` opening tag in `[pos, boundary)`.
///
/// A candidate only matches when the name is followed by whitespace, `>` or
/// `/`, so searching for `table:table` never stops at `<table:table-row`.
pub fn find_opening_tag(buf: &str, pos: usize, name: &str, boundary: usize) -> Option<usize> {
    let bytes = buf.as_bytes();
    let boundary = boundary.min(bytes.len());
    if name.is_empty() || pos >= boundary {
        return None;
    }
    let finder = memmem::Finder::new(name.as_bytes());
    find_delimited(bytes, &finder, b"<", pos, boundary, is_name_end)
}

/// Resolve the extent of the element whose opening `<` sits at `pos - 1`.
///
/// Returns `None` when the opening tag's `>` or the matching closing tag
/// does not occur before `boundary`.
pub fn find_closing_tag_end(buf: &str, pos: usize, boundary: usize) -> Option<TagSpan> {
    let bytes = buf.as_bytes();
    let boundary = boundary.min(bytes.len());
    let name_end = word_end(buf, pos);
    if pos == 0 || name_end >= boundary {
        return None;
    }
    let open_start = pos - 1;
    let gt = name_end + memchr(b'>', &bytes[name_end..boundary])?;
    let inner_start = gt + 1;

    if gt > pos && bytes[gt - 1] == b'/' {
        return Some(TagSpan {
            outer: Span::from_range(open_start, inner_start),
            inner: Span::from_range(inner_start, inner_start),
            self_closing: true,
        });
    }

    let name = &bytes[pos..name_end];
    if name.is_empty() {
        return None;
    }
    let finder = memmem::Finder::new(name);
    let close_len = name.len() + 3;
    let find_close = |from: usize| find_delimited(bytes, &finder, b"</", from, boundary, |b| b == b'>');

    let mut depth = 1usize;
    let mut cursor = inner_start;
    let mut close = find_close(cursor)?;
    loop {
        match find_delimited(bytes, &finder, b"<", cursor, close, is_name_end) {
            Some(open) => {
                let after_name = open + 1 + name.len();
                let nested_gt = after_name + memchr(b'>', &bytes[after_name..boundary])?;
                // <name .../> closes itself and leaves depth alone
                if bytes[nested_gt - 1] != b'/' {
                    depth += 1;
                }
                cursor = after_name;
            }
            None => {
                depth -= 1;
                cursor = close + close_len;
                if depth == 0 {
                    return Some(TagSpan {
                        outer: Span::from_range(open_start, cursor),
                        inner: Span::from_range(inner_start, close),
                        self_closing: false,
                    });
                }
                close = find_close(cursor)?;
            }
        }
    }
}

/// Locate the next complete `name` element in `[pos, boundary)`.
pub fn next_element(buf: &str, name: &str, pos: usize, boundary: usize) -> Option<TagSpan> {
    let open = find_opening_tag(buf, pos, name, boundary)?;
    find_closing_tag_end(buf, open + 1, boundary)
}

/// Check whether `markup` starts with an opening tag named exactly `name`.
#[inline]
pub fn starts_with_tag(markup: &str, name: &str) -> bool {
    let bytes = markup.as_bytes();
    bytes.first() == Some(&b'<')
        && bytes[1..].starts_with(name.as_bytes())
        && bytes.get(1 + name.len()).is_some_and(|&b| is_name_end(b))
}
