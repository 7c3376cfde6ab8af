//! Locating the text body inside a full `content.xml`.

use crate::scan::next_element;

/// Element name of the text body.
pub const OFFICE_TEXT: &str = "office:text";

/// Inner markup of the first `office:text` element, if there is one.
///
/// A self-closing `<office:text/>` yields an empty body.
///
/// ```rust
/// use odtscan_core::body::office_text;
///
/// let xml = r#"<?xml version="1.0"?><office:document-content><office:body><office:text><text:p>Hi</text:p></office:text></office:body></office:document-content>"#;
/// assert_eq!(office_text(xml), Some("<text:p>Hi</text:p>"));
/// ```
pub fn office_text(content_xml: &str) -> Option<&str> {
    let tag = next_element(content_xml, OFFICE_TEXT, 0, content_xml.len())?;
    Some(tag.inner.slice(content_xml))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_body() {
        assert_eq!(office_text("<text:p>loose</text:p>"), None);
        assert_eq!(office_text("<office:text><text:p>open"), None);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(office_text("<office:body><office:text/></office:body>"), Some(""));
    }

    #[test]
    fn test_body_with_attributes() {
        let xml = "<office:text text:use-soft-page-breaks=\"true\">\n<text:p/>\n</office:text>";
        assert_eq!(office_text(xml), Some("\n<text:p/>\n"));
    }
}
