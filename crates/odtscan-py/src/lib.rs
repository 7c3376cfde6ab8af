//! Python bindings for the odtscan body scanner.

use odtscan_core::{
    error::{ReadError as CoreReadError, ReadErrorKind as CoreReadErrorKind},
    span::Span as CoreSpan,
    Document as CoreDocument, Table as CoreTable, TableOptions,
};
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

// ============================================================================
// Span
// ============================================================================

/// Source location in the body markup (byte offsets).
#[pyclass(frozen, get_all, name = "Span")]
#[derive(Clone)]
pub struct PySpan {
    pub start: u32,
    pub end: u32,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        format!("Span({}, {})", self.start, self.end)
    }

    #[getter]
    fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl From<CoreSpan> for PySpan {
    fn from(s: CoreSpan) -> Self {
        PySpan {
            start: s.start,
            end: s.end,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

fn to_py_err(e: CoreReadError) -> PyErr {
    match e.kind {
        CoreReadErrorKind::IndexOutOfRange => PyIndexError::new_err(e.to_string()),
        CoreReadErrorKind::MissingCell => PyValueError::new_err(e.to_string()),
    }
}

// ============================================================================
// Table
// ============================================================================

/// A table extracted from the body.
///
/// `columns` holds the positional column names ("0", "1", ...), `rows` the
/// cell values as lists of strings, each exactly `len(columns)` long.
#[pyclass(frozen, get_all, name = "Table")]
pub struct PyTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub span: Option<PySpan>,
}

#[pymethods]
impl PyTable {
    fn __repr__(&self) -> String {
        format!("Table(columns={}, rows={})", self.columns.len(), self.rows.len())
    }

    fn __len__(&self) -> usize {
        self.rows.len()
    }

    /// Get a cell value. Raises IndexError when out of range.
    #[pyo3(text_signature = "(self, row, column)")]
    fn cell(&self, row: usize, column: usize) -> PyResult<String> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .cloned()
            .ok_or_else(|| PyIndexError::new_err(format!("cell ({}, {}) out of range", row, column)))
    }
}

impl From<CoreTable<'_>> for PyTable {
    fn from(table: CoreTable<'_>) -> Self {
        PyTable {
            columns: table.column_names(),
            rows: table
                .rows
                .into_iter()
                .map(|row| row.cells.into_iter().map(|c| c.into_owned()).collect())
                .collect(),
            span: table.span.map(PySpan::from),
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// A document body session.
///
/// Args:
///     content: Full content.xml text, or a bare body fragment with body=True
///     body: Treat content as a body fragment (default: False)
#[pyclass(unsendable, name = "Document")]
pub struct PyDocument {
    inner: CoreDocument,
}

#[pymethods]
impl PyDocument {
    #[new]
    #[pyo3(signature = (content, body=false), text_signature = "(content, body=False)")]
    fn new(content: &str, body: bool) -> Self {
        let inner = if body {
            CoreDocument::new(content)
        } else {
            CoreDocument::from_content_xml(content)
        };
        PyDocument { inner }
    }

    /// The body markup.
    #[getter]
    fn content(&self) -> &str {
        self.inner.content()
    }

    /// Number of top-level lines.
    fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    /// Raw markup of a line. Raises IndexError when out of range.
    #[pyo3(text_signature = "(self, index)")]
    fn raw_line(&self, index: usize) -> PyResult<String> {
        self.inner
            .raw_line(index)
            .map(str::to_string)
            .map_err(to_py_err)
    }

    /// Plain text of a line. Raises IndexError when out of range.
    #[pyo3(text_signature = "(self, index)")]
    fn plain_line(&self, index: usize) -> PyResult<String> {
        self.inner
            .plain_line(index)
            .map(|t| t.into_owned())
            .map_err(to_py_err)
    }

    /// Index of the first line at or after `start` containing `needle`,
    /// or None.
    #[pyo3(signature = (needle, start=0), text_signature = "(self, needle, start=0)")]
    fn line_index_of(&self, needle: &str, start: usize) -> Option<usize> {
        self.inner.line_index_of(needle, start)
    }

    /// Number of top-level tables.
    fn table_count(&self) -> usize {
        self.inner.table_count()
    }

    /// Raw markup of a table, or None.
    #[pyo3(text_signature = "(self, index)")]
    fn raw_table(&self, index: usize) -> Option<String> {
        self.inner.raw_table(index).map(str::to_string)
    }

    /// Extract a table.
    ///
    /// Raises IndexError for a missing table and ValueError when `strict`
    /// is set and a row is missing cells.
    #[pyo3(
        signature = (index, raw=false, strict=false),
        text_signature = "(self, index, raw=False, strict=False)"
    )]
    fn table(&self, index: usize, raw: bool, strict: bool) -> PyResult<PyTable> {
        let options = TableOptions::new().raw_cells(raw).strict(strict);
        self.inner
            .table(index, options)
            .map(PyTable::from)
            .map_err(to_py_err)
    }

    /// Replace the body markup.
    #[pyo3(text_signature = "(self, content)")]
    fn set_content(&mut self, content: &str) {
        self.inner.set_content(content);
    }

    fn __len__(&self) -> usize {
        self.inner.line_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "Document(lines={}, tables={})",
            self.inner.line_count(),
            self.inner.table_count()
        )
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Strip all markup from a string.
///
/// Args:
///     markup: Markup text
///
/// Returns:
///     str: Character data only, entities left as written
#[pyfunction]
#[pyo3(text_signature = "(markup)")]
fn plain_text(markup: &str) -> String {
    odtscan_core::plain_text(markup).into_owned()
}

// ============================================================================
// Module
// ============================================================================

/// odtscan - Lines, plain text and tables from OpenDocument text bodies.
#[pymodule]
fn pyodtscan(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpan>()?;
    m.add_class::<PyTable>()?;
    m.add_class::<PyDocument>()?;
    m.add_function(wrap_pyfunction!(plain_text, m)?)?;
    Ok(())
}
