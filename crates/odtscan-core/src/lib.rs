//! # odtscan Core
//!
//! An allocation-light scanner for OpenDocument text bodies.
//!
//! The body of a document is read as a flat markup string. No tree is
//! built: top-level elements ("lines"), plain text and tables are recovered
//! by index arithmetic over the buffer.
//!
//! ## Quick Start
//!
//! ```rust
//! use odtscan_core::{Document, TableOptions};
//!
//! let body = concat!(
//!     "<text:p>Audio:http://example.org/</text:p>",
//!     "<table:table><table:table-column table:number-columns-repeated=\"2\"/>",
//!     "<table:table-row><table:table-cell><text:p>01:00</text:p></table:table-cell>",
//!     "<table:table-cell><text:p>Intro</text:p></table:table-cell></table:table-row>",
//!     "</table:table>",
//! );
//! let doc = Document::new(body);
//!
//! assert_eq!(doc.line_count(), 2);
//! assert_eq!(doc.line_index_of("Audio:", 0), Some(0));
//!
//! let table = doc.table(0, TableOptions::default()).unwrap();
//! assert_eq!(table.column_count(), 2);
//! assert_eq!(table.cell(0, 1).unwrap(), "Intro");
//! ```
//!
//! ## Error Handling
//!
//! Scanner functions report "not found" and "unterminated" as `None`.
//! Only caller-facing violations become a [`ReadError`]:
//!
//! ```rust
//! use odtscan_core::{Document, ReadErrorKind, TableOptions};
//!
//! let doc = Document::new("<text:p>only line</text:p>");
//! assert_eq!(doc.raw_line(3).unwrap_err().kind, ReadErrorKind::IndexOutOfRange);
//! assert_eq!(doc.line_index_of("only", 5), None);
//! assert!(doc.table(0, TableOptions::default()).is_err());
//! ```

pub mod body;
pub mod document;
pub mod error;
pub mod lines;
pub mod scan;
pub mod span;
pub mod table;
pub mod text;

pub use document::Document;
pub use error::{ReadError, ReadErrorKind};
pub use lines::{Line, LineSplitter};
pub use scan::TagSpan;
pub use span::Span;
pub use table::{Column, Row, Table, TableOptions};
pub use text::plain_text;
