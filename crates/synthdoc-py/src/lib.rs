//! Python bindings for the synthdoc report parser.

use pyo3::prelude::*;
use pyo3::types::PyList;
use synthdoc_core::{Block, Document, LineRange as CoreLineRange, Row, Span as CoreSpan};

// ============================================================================
// Source lines
// ============================================================================

/// Zero-based, half-open range of source lines.
#[pyclass(frozen, get_all, name = "LineRange")]
#[derive(Clone)]
pub struct PyLineRange {
    pub start: u32,
    pub end: u32,
}

#[pymethods]
impl PyLineRange {
    fn __repr__(&self) -> String {
        format!("LineRange({}, {})", self.start, self.end)
    }

    fn __len__(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }
}

impl From<CoreLineRange> for PyLineRange {
    fn from(r: CoreLineRange) -> Self {
        PyLineRange {
            start: r.start,
            end: r.end,
        }
    }
}

// ============================================================================
// Span
// ============================================================================

/// A run of text with at most one style flag set.
#[pyclass(frozen, get_all, name = "Span")]
#[derive(Clone)]
pub struct PySpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        format!("Span({:?}, {})", self.text, self.kind())
    }

    fn __str__(&self) -> String {
        self.text.clone()
    }

    /// One of "plain", "bold", "italic", "code".
    #[getter]
    fn kind(&self) -> &'static str {
        if self.bold {
            "bold"
        } else if self.italic {
            "italic"
        } else if self.code {
            "code"
        } else {
            "plain"
        }
    }
}

impl From<CoreSpan<'_>> for PySpan {
    fn from(s: CoreSpan<'_>) -> Self {
        PySpan {
            text: s.text.into_owned(),
            bold: s.bold,
            italic: s.italic,
            code: s.code,
        }
    }
}

fn convert_spans(spans: Vec<CoreSpan<'_>>) -> Vec<PySpan> {
    spans.into_iter().map(PySpan::from).collect()
}

fn convert_row(row: Row<'_>) -> Vec<Vec<PySpan>> {
    row.into_iter().map(convert_spans).collect()
}

// ============================================================================
// Block types
// ============================================================================

/// Section heading, level 1 to 3.
#[pyclass(frozen, get_all, name = "Heading")]
pub struct PyHeading {
    pub level: u8,
    pub spans: Vec<PySpan>,
    pub lines: PyLineRange,
}

/// One line of prose.
#[pyclass(frozen, get_all, name = "Paragraph")]
pub struct PyParagraph {
    pub spans: Vec<PySpan>,
    pub lines: PyLineRange,
}

/// Bulleted list entry.
#[pyclass(frozen, get_all, name = "BulletItem")]
pub struct PyBulletItem {
    pub spans: Vec<PySpan>,
    pub lines: PyLineRange,
}

/// Numbered list entry. `ordinal` is the number written in the source.
#[pyclass(frozen, get_all, name = "NumberedItem")]
pub struct PyNumberedItem {
    pub ordinal: u64,
    pub spans: Vec<PySpan>,
    pub lines: PyLineRange,
}

/// Pipe table. Rows may be ragged.
#[pyclass(frozen, get_all, name = "Table")]
pub struct PyTable {
    pub header: Vec<Vec<PySpan>>,
    pub rows: Vec<Vec<Vec<PySpan>>>,
    pub lines: PyLineRange,
}

#[pymethods]
impl PyTable {
    fn __repr__(&self) -> String {
        format!(
            "Table(columns={}, rows={})",
            self.header.len(),
            self.rows.len()
        )
    }
}

/// Horizontal rule.
#[pyclass(frozen, get_all, name = "Rule")]
pub struct PyRule {
    pub lines: PyLineRange,
}

#[pymethods]
impl PyRule {
    fn __repr__(&self) -> String {
        "Rule()".to_string()
    }
}

fn convert_blocks<'py>(py: Python<'py>, blocks: Vec<Block<'_>>) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for block in blocks {
        list.append(convert_block(py, block)?)?;
    }
    Ok(list)
}

fn convert_block(py: Python<'_>, block: Block<'_>) -> PyResult<PyObject> {
    let obj = match block {
        Block::Heading(h) => Py::new(
            py,
            PyHeading {
                level: h.level.as_u8(),
                spans: convert_spans(h.spans),
                lines: h.lines.into(),
            },
        )?
        .into_any(),
        Block::Paragraph(p) => Py::new(
            py,
            PyParagraph {
                spans: convert_spans(p.spans),
                lines: p.lines.into(),
            },
        )?
        .into_any(),
        Block::BulletItem(b) => Py::new(
            py,
            PyBulletItem {
                spans: convert_spans(b.spans),
                lines: b.lines.into(),
            },
        )?
        .into_any(),
        Block::NumberedItem(n) => Py::new(
            py,
            PyNumberedItem {
                ordinal: n.ordinal,
                spans: convert_spans(n.spans),
                lines: n.lines.into(),
            },
        )?
        .into_any(),
        Block::Table(t) => Py::new(
            py,
            PyTable {
                header: convert_row(t.header),
                rows: t.rows.into_iter().map(convert_row).collect(),
                lines: t.lines.into(),
            },
        )?
        .into_any(),
        Block::Rule(lines) => Py::new(
            py,
            PyRule {
                lines: lines.into(),
            },
        )?
        .into_any(),
    };
    Ok(obj)
}

// ============================================================================
// PyDocument
// ============================================================================

/// A parsed synthesis report.
#[pyclass(frozen, name = "Document")]
pub struct PyDocument {
    #[pyo3(get)]
    pub blocks: Py<PyList>,
    #[pyo3(get)]
    pub lines: PyLineRange,
    text: String,
}

#[pymethods]
impl PyDocument {
    fn __repr__(&self, py: Python<'_>) -> String {
        format!(
            "Document(blocks={}, lines={})",
            self.blocks.bind(py).len(),
            self.lines.end
        )
    }

    fn __len__(&self, py: Python<'_>) -> usize {
        self.blocks.bind(py).len()
    }

    /// Style-free text, one line per block, rules skipped.
    fn plain_text(&self) -> String {
        self.text.clone()
    }
}

fn convert_document(py: Python<'_>, doc: Document<'_>) -> PyResult<PyDocument> {
    let text = doc.plain_text();
    let lines = doc.lines.into();
    Ok(PyDocument {
        blocks: convert_blocks(py, doc.blocks)?.unbind(),
        lines,
        text,
    })
}

// ============================================================================
// Functions
// ============================================================================

/// Parse report text into a Document.
///
/// Args:
///     text: Report markdown, or None for an empty document
///
/// Returns:
///     Document: Blocks in source order
#[pyfunction]
#[pyo3(signature = (text=None), text_signature = "(text=None)")]
fn parse(py: Python<'_>, text: Option<&str>) -> PyResult<PyDocument> {
    let doc = synthdoc_core::parse(text.unwrap_or_default());
    convert_document(py, doc)
}

/// Split one line into styled spans.
#[pyfunction]
#[pyo3(text_signature = "(line)")]
fn tokenize(line: &str) -> Vec<PySpan> {
    convert_spans(synthdoc_core::tokenize(line))
}

/// Remove inline markers, keeping the text they wrap.
#[pyfunction]
#[pyo3(text_signature = "(line)")]
fn strip_markers(line: &str) -> String {
    synthdoc_core::strip_markers(line)
}

// ============================================================================
// Module
// ============================================================================

/// synthdoc - parser for research synthesis reports.
#[pymodule]
fn pysd(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLineRange>()?;
    m.add_class::<PySpan>()?;
    m.add_class::<PyDocument>()?;
    m.add_class::<PyHeading>()?;
    m.add_class::<PyParagraph>()?;
    m.add_class::<PyBulletItem>()?;
    m.add_class::<PyNumberedItem>()?;
    m.add_class::<PyTable>()?;
    m.add_class::<PyRule>()?;
    m.add_function(wrap_pyfunction!(parse, m)?)?;
    m.add_function(wrap_pyfunction!(tokenize, m)?)?;
    m.add_function(wrap_pyfunction!(strip_markers, m)?)?;
    Ok(())
}
