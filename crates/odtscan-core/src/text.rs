//! Character data extraction.

use std::borrow::Cow;

use memchr::memchr;

/// Strip every tag from `markup`, keeping only character data.
///
/// Everything from a `<` up to and including the next `>` is dropped. An
/// unmatched `<` suppresses the rest of the input. Entities are left as
/// written. Borrows when there is nothing to strip.
///
/// ```rust
/// use odtscan_core::text::plain_text;
///
/// assert_eq!(plain_text("<p>Hello <b>World</b></p>"), "Hello World");
/// ```
pub fn plain_text(markup: &str) -> Cow<'_, str> {
    let bytes = markup.as_bytes();
    let Some(first) = memchr(b'<', bytes) else {
        return Cow::Borrowed(markup);
    };

    let mut out = String::with_capacity(markup.len() - first);
    out.push_str(&markup[..first]);
    let mut pos = first;
    // pos always sits on a '<' at the top of the loop
    while let Some(gt) = memchr(b'>', &bytes[pos..]) {
        let text_start = pos + gt + 1;
        match memchr(b'<', &bytes[text_start..]) {
            Some(lt) => {
                out.push_str(&markup[text_start..text_start + lt]);
                pos = text_start + lt;
            }
            None => {
                out.push_str(&markup[text_start..]);
                break;
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_markup() {
        assert_eq!(plain_text("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_borrows_without_tags() {
        assert!(matches!(plain_text("just text"), Cow::Borrowed("just text")));
        assert!(matches!(plain_text(""), Cow::Borrowed("")));
    }

    #[test]
    fn test_unmatched_lt_suppresses_rest() {
        assert_eq!(plain_text("abc<def"), "abc");
        assert_eq!(plain_text("<a>x</a>y<z"), "xy");
    }

    #[test]
    fn test_entities_are_untouched() {
        assert_eq!(plain_text("<p>a &amp; b</p>"), "a &amp; b");
    }

    #[test]
    fn test_stray_gt_is_text() {
        assert_eq!(plain_text("a > b<br/>c"), "a > bc");
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            plain_text("<text:p>wo Füße <text:s/>nicht</text:p>"),
            "wo Füße nicht"
        );
    }
}
