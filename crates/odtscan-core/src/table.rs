//! Table extraction from `table:table` markup.
//!
//! The grid is recovered by scanning for column declarations, rows and
//! cells by name. Rows and cells come back in document order, which is what
//! positional access relies on.

use std::borrow::Cow;

use memchr::{memchr, memmem};

use crate::error::ReadError;
use crate::scan::{find_opening_tag, next_element, TagSpan};
use crate::span::Span;
use crate::text::plain_text;

/// Element name of a table.
pub const TABLE: &str = "table:table";
/// Element name of a column declaration.
pub const COLUMN: &str = "table:table-column";
/// Element name of a row.
pub const ROW: &str = "table:table-row";
/// Element name of a cell.
pub const CELL: &str = "table:table-cell";

const COLUMNS_REPEATED: &str = "table:number-columns-repeated=\"";

/// Upper bound on a table's effective column count.
///
/// Office suites write trailing empty columns as one huge repeat count
/// (`number-columns-repeated="16384"` or more); widths beyond this are
/// clamped so rows stay allocatable.
pub const MAX_COLUMNS: usize = 16384;

/// How cell values are produced.
///
/// The default reads plain text and fills missing cells with empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableOptions {
    /// Return each cell's raw inner markup instead of its plain text.
    pub raw_cells: bool,
    /// Fail with [`ReadErrorKind::MissingCell`](crate::error::ReadErrorKind)
    /// when a row has fewer cells than declared columns.
    pub strict: bool,
}

impl TableOptions {
    /// Plain-text, lenient extraction.
    pub const fn new() -> Self {
        Self {
            raw_cells: false,
            strict: false,
        }
    }

    /// Select raw markup cells.
    pub const fn raw_cells(mut self, raw: bool) -> Self {
        self.raw_cells = raw;
        self
    }

    /// Select strict missing-cell handling.
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Decode the legacy bit-field: bit 0 raw cells, bit 1 strict.
    /// Other bits are ignored.
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            raw_cells: bits & 1 != 0,
            strict: bits & 2 != 0,
        }
    }

    /// Encode as the legacy bit-field.
    pub const fn bits(&self) -> u32 {
        (self.raw_cells as u32) | ((self.strict as u32) << 1)
    }
}

/// One `table:table-column` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Number of effective columns this declaration stands for (at least 1).
    pub repeat: u32,
    /// The declaration's markup.
    pub span: Span,
}

/// One table row, always exactly as wide as the table's column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub cells: Vec<Cow<'a, str>>,
    pub span: Span,
}

impl<'a> Row<'a> {
    /// Get a cell value by column index.
    pub fn cell(&self, column: usize) -> Result<&str, ReadError> {
        self.cells
            .get(column)
            .map(|c| c.as_ref())
            .ok_or_else(|| ReadError::index_out_of_range("column", column, self.cells.len()))
    }

    pub fn into_owned(self) -> Row<'static> {
        Row {
            cells: self
                .cells
                .into_iter()
                .map(|c| Cow::Owned(c.into_owned()))
                .collect(),
            span: self.span,
        }
    }
}

/// A table recovered from markup: column declarations plus a grid of text
/// cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table<'a> {
    pub columns: Vec<Column>,
    pub rows: Vec<Row<'a>>,
    /// The `table:table` element, or `None` if the markup had no table.
    pub span: Option<Span>,
}

impl<'a> Table<'a> {
    /// Effective column count, with repeat counts expanded and clamped to
    /// [`MAX_COLUMNS`].
    pub fn column_count(&self) -> usize {
        effective_width(&self.columns)
    }

    /// Column names. Columns are text-typed and named by position.
    pub fn column_names(&self) -> Vec<String> {
        (0..self.column_count()).map(|i| i.to_string()).collect()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Result<&Row<'a>, ReadError> {
        self.rows
            .get(index)
            .ok_or_else(|| ReadError::index_out_of_range("row", index, self.rows.len()))
    }

    /// Get a cell value by row and column index.
    pub fn cell(&self, row: usize, column: usize) -> Result<&str, ReadError> {
        self.row(row)?.cell(column)
    }

    /// Detach the table from the buffer it was read from.
    pub fn into_owned(self) -> Table<'static> {
        Table {
            columns: self.columns,
            rows: self.rows.into_iter().map(Row::into_owned).collect(),
            span: self.span,
        }
    }
}

/// Read the repeat count out of a column declaration's attribute text.
fn column_repeat(attrs: &str) -> u32 {
    let Some(at) = memmem::find(attrs.as_bytes(), COLUMNS_REPEATED.as_bytes()) else {
        return 1;
    };
    let value = &attrs[at + COLUMNS_REPEATED.len()..];
    let Some(quote) = memchr(b'"', value.as_bytes()) else {
        return 1;
    };
    match value[..quote].parse::<u32>() {
        Ok(n) if n > 0 => n.min(MAX_COLUMNS as u32),
        _ => 1,
    }
}

fn effective_width(columns: &[Column]) -> usize {
    columns
        .iter()
        .map(|c| c.repeat as usize)
        .sum::<usize>()
        .min(MAX_COLUMNS)
}

/// Collect the column declarations inside a table's inner span.
///
/// Declarations are only looked for ahead of the first row, so columns of a
/// table nested in a cell are never counted. Repeat counts above
/// [`MAX_COLUMNS`] are clamped. Returns the declarations and the position
/// where row scanning should resume.
pub fn count_columns(buf: &str, inner: Span) -> (Vec<Column>, usize) {
    let bytes = buf.as_bytes();
    let mut pos = inner.start as usize;
    let end = inner.end as usize;
    let limit = find_opening_tag(buf, pos, ROW, end).unwrap_or(end);

    let mut columns = Vec::new();
    while let Some(open) = find_opening_tag(buf, pos, COLUMN, limit) {
        let attrs_start = open + 1 + COLUMN.len();
        let Some(rel) = memchr(b'>', &bytes[attrs_start..limit]) else {
            break;
        };
        let gt = attrs_start + rel;
        columns.push(Column {
            repeat: column_repeat(&buf[attrs_start..gt]),
            span: Span::from_range(open, gt + 1),
        });
        pos = gt + 1;
    }
    (columns, pos)
}

#[inline]
fn cell_value(buf: &str, inner: Span, options: TableOptions) -> Cow<'_, str> {
    let raw = inner.slice(buf);
    if options.raw_cells {
        Cow::Borrowed(raw)
    } else {
        plain_text(raw)
    }
}

fn extract_row<'a>(
    buf: &'a str,
    row: TagSpan,
    width: usize,
    row_index: usize,
    options: TableOptions,
) -> Result<Row<'a>, ReadError> {
    let mut cells = Vec::with_capacity(width);
    let mut cursor = row.inner.start as usize;
    let end = row.inner.end as usize;

    while cells.len() < width {
        match next_element(buf, CELL, cursor, end) {
            Some(cell) => {
                cells.push(cell_value(buf, cell.inner, options));
                cursor = cell.end();
            }
            None if options.strict => {
                log::trace!("row {} has {} of {} cells", row_index, cells.len(), width);
                return Err(ReadError::missing_cell(row_index, cells.len(), Some(row.outer)));
            }
            None => cells.resize(width, Cow::Borrowed("")),
        }
    }

    Ok(Row {
        cells,
        span: row.outer,
    })
}

/// Extract the first table element found in `markup`.
///
/// Markup without a table yields an empty table. Cells past the column
/// count are ignored.
///
/// ```rust
/// use odtscan_core::table::{extract_table, TableOptions};
///
/// let markup = r#"<table:table table:name="T">
///   <table:table-column table:number-columns-repeated="2"/>
///   <table:table-row>
///     <table:table-cell><text:p>a</text:p></table:table-cell>
///     <table:table-cell><text:p>b</text:p></table:table-cell>
///   </table:table-row>
/// </table:table>"#;
///
/// let table = extract_table(markup, TableOptions::default()).unwrap();
/// assert_eq!(table.column_count(), 2);
/// assert_eq!(table.cell(0, 1).unwrap(), "b");
/// ```
pub fn extract_table(markup: &str, options: TableOptions) -> Result<Table<'_>, ReadError> {
    let Some(table) = next_element(markup, TABLE, 0, markup.len()) else {
        return Ok(Table::default());
    };

    let (columns, mut pos) = count_columns(markup, table.inner);
    let width = effective_width(&columns);
    let end = table.inner.end as usize;

    let mut rows = Vec::new();
    while let Some(row) = next_element(markup, ROW, pos, end) {
        rows.push(extract_row(markup, row, width, rows.len(), options)?);
        pos = row.end();
    }

    Ok(Table {
        columns,
        rows,
        span: Some(table.outer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadErrorKind;

    #[test]
    fn test_options_bits() {
        assert_eq!(TableOptions::from_bits(0), TableOptions::default());
        let both = TableOptions::from_bits(3 | 4);
        assert!(both.raw_cells && both.strict);
        assert_eq!(both.bits(), 3);
        assert_eq!(TableOptions::new().strict(true).bits(), 2);
    }

    #[test]
    fn test_column_repeat() {
        assert_eq!(column_repeat(" table:number-columns-repeated=\"3\"/"), 3);
        assert_eq!(column_repeat(" table:style-name=\"A\"/"), 1);
        assert_eq!(column_repeat(" table:number-columns-repeated=\"0\"/"), 1);
        assert_eq!(column_repeat(" table:number-columns-repeated=\"x\"/"), 1);
        assert_eq!(column_repeat(" table:number-columns-repeated=\"-2\"/"), 1);
        assert_eq!(column_repeat(" table:number-columns-repeated=\"4"), 1);
        assert_eq!(
            column_repeat(" table:number-columns-repeated=\"4294967295\"/"),
            MAX_COLUMNS as u32
        );
    }

    #[test]
    fn test_huge_repeat_is_clamped() {
        let buf = "<table:table><table:table-column/>\
                   <table:table-column table:number-columns-repeated=\"4294967295\"/>\
                   <table:table-column table:number-columns-repeated=\"4294967295\"/>\
                   <table:table-row><table:table-cell>a</table:table-cell></table:table-row>\
                   </table:table>";
        let table = extract_table(buf, TableOptions::default()).unwrap();
        assert_eq!(table.column_count(), MAX_COLUMNS);
        assert_eq!(table.rows[0].cells.len(), MAX_COLUMNS);
        assert_eq!(table.cell(0, 0).unwrap(), "a");
        assert_eq!(table.cell(0, MAX_COLUMNS - 1).unwrap(), "");
        assert!(table.cell(0, MAX_COLUMNS).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_count_columns_stops_at_rows() {
        let buf = "<t><table:table-column/><table:table-column table:number-columns-repeated=\"2\"/>\
                   <table:table-row><table:table-cell><table:table><table:table-column/></table:table></table:table-cell></table:table-row></t>";
        let (columns, resume) = count_columns(buf, Span::from_range(3, buf.len() - 4));
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.iter().map(|c| c.repeat).sum::<u32>(), 3);
        assert_eq!(&buf[resume..resume + 16], "<table:table-row");
    }

    #[test]
    fn test_no_table() {
        let table = extract_table("<text:p>none</text:p>", TableOptions::default()).unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
        assert!(table.span.is_none());
    }

    #[test]
    fn test_empty_cells_and_short_rows() {
        let buf = "<table:table><table:table-column table:number-columns-repeated=\"3\"/>\
                   <table:table-row><table:table-cell/><table:table-cell>b</table:table-cell></table:table-row>\
                   <table:table-row/></table:table>";
        let table = extract_table(buf, TableOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells, vec!["", "b", ""]);
        assert_eq!(table.rows[1].cells, vec!["", "", ""]);

        let err = extract_table(buf, TableOptions::new().strict(true)).unwrap_err();
        assert_eq!(err.kind, ReadErrorKind::MissingCell);
        assert!(err.message.contains("row 0, column 2"));
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let buf = "<table:table><table:table-column/>\
                   <table:table-row><table:table-cell>1</table:table-cell><table:table-cell>2</table:table-cell></table:table-row>\
                   </table:table>";
        let table = extract_table(buf, TableOptions::new().strict(true)).unwrap();
        assert_eq!(table.rows[0].cells, vec!["1"]);
    }

    #[test]
    fn test_raw_cells_borrow() {
        let buf = "<table:table><table:table-column/>\
                   <table:table-row><table:table-cell><text:p>x</text:p></table:table-cell></table:table-row>\
                   </table:table>";
        let table = extract_table(buf, TableOptions::new().raw_cells(true)).unwrap();
        assert!(matches!(&table.rows[0].cells[0], Cow::Borrowed("<text:p>x</text:p>")));
    }

    #[test]
    fn test_cell_out_of_range() {
        let buf = "<table:table><table:table-column/>\
                   <table:table-row><table:table-cell>1</table:table-cell></table:table-row>\
                   </table:table>";
        let table = extract_table(buf, TableOptions::default()).unwrap();
        assert_eq!(table.cell(0, 0).unwrap(), "1");
        assert!(table.cell(0, 1).unwrap_err().is_out_of_range());
        assert!(table.cell(1, 0).unwrap_err().is_out_of_range());
        assert_eq!(table.column_names(), vec!["0"]);
    }
}
