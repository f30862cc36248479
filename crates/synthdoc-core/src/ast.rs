//! Document model produced by the parser.
//!
//! This module contains every node type handed to renderers.
//! The model is designed to be:
//!
//! - **Zero-copy**: Uses `Cow<'a, str>` to borrow from input when possible
//! - **Line-tracked**: Every block records the source lines it came from
//! - **Flat**: Spans never nest, tables hold rows of cells of spans
//!
//! Renderers decide presentation. In particular a [`Block::Rule`] carries no
//! layout decision: one export path drops it, the other turns it into
//! vertical spacing.

use crate::source::LineRange;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// A parsed report.
///
/// Blocks appear in source order. A report without content is an empty
/// document, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document<'a> {
    /// Content blocks in document order.
    pub blocks: Vec<Block<'a>>,
    /// Lines covered by the whole input.
    pub lines: LineRange,
}

impl<'a> Document<'a> {
    /// Number of blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has no blocks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the blocks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block<'a>> {
        self.blocks.iter()
    }

    /// Style-free text of the whole document.
    ///
    /// Each non-rule block contributes its [`Block::plain_text`], separated
    /// by newlines. Rules contribute nothing.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in self.blocks.iter().filter(|b| !matches!(b, Block::Rule(_))) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&block.plain_text());
        }
        out
    }

    /// Detach the document from the input buffer.
    pub fn into_owned(self) -> Document<'static> {
        Document {
            blocks: self.blocks.into_iter().map(Block::into_owned).collect(),
            lines: self.lines,
        }
    }
}

impl<'a> IntoIterator for Document<'a> {
    type Item = Block<'a>;
    type IntoIter = std::vec::IntoIter<Block<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

impl<'d, 'a> IntoIterator for &'d Document<'a> {
    type Item = &'d Block<'a>;
    type IntoIter = std::slice::Iter<'d, Block<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// Section heading (levels 1-3).
    Heading(Heading<'a>),
    /// A single line of prose.
    Paragraph(Paragraph<'a>),
    /// `- ` or `* ` list entry.
    BulletItem(BulletItem<'a>),
    /// `N. ` list entry.
    NumberedItem(NumberedItem<'a>),
    /// Pipe table with a header row.
    Table(Table<'a>),
    /// `---` or `***` separator.
    Rule(LineRange),
}

/// Discriminant of a [`Block`], for counting and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Paragraph,
    BulletItem,
    NumberedItem,
    Table,
    Rule,
}

impl<'a> Block<'a> {
    /// The kind of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading(_) => BlockKind::Heading,
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::BulletItem(_) => BlockKind::BulletItem,
            Block::NumberedItem(_) => BlockKind::NumberedItem,
            Block::Table(_) => BlockKind::Table,
            Block::Rule(_) => BlockKind::Rule,
        }
    }

    /// Source lines this block was built from.
    pub fn lines(&self) -> LineRange {
        match self {
            Block::Heading(h) => h.lines,
            Block::Paragraph(p) => p.lines,
            Block::BulletItem(b) => b.lines,
            Block::NumberedItem(n) => n.lines,
            Block::Table(t) => t.lines,
            Block::Rule(lines) => *lines,
        }
    }

    /// Inline content of single-line textual blocks.
    ///
    /// Returns `None` for tables and rules.
    pub fn spans(&self) -> Option<&[Span<'a>]> {
        match self {
            Block::Heading(h) => Some(&h.spans),
            Block::Paragraph(p) => Some(&p.spans),
            Block::BulletItem(b) => Some(&b.spans),
            Block::NumberedItem(n) => Some(&n.spans),
            Block::Table(_) | Block::Rule(_) => None,
        }
    }

    /// Style-free text of this block.
    ///
    /// Table cells are joined with `" | "` and rows (header first) with
    /// newlines. A rule has no text.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Table(t) => {
                let mut out = String::new();
                for (i, row) in t.all_rows().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    let cells: Vec<String> = row.iter().map(|cell| plain_text(cell)).collect();
                    out.push_str(&cells.join(" | "));
                }
                out
            }
            Block::Rule(_) => String::new(),
            _ => self.spans().map(plain_text).unwrap_or_default(),
        }
    }

    /// Detach the block from the input buffer.
    pub fn into_owned(self) -> Block<'static> {
        match self {
            Block::Heading(h) => Block::Heading(Heading {
                level: h.level,
                spans: owned_spans(h.spans),
                lines: h.lines,
            }),
            Block::Paragraph(p) => Block::Paragraph(Paragraph {
                spans: owned_spans(p.spans),
                lines: p.lines,
            }),
            Block::BulletItem(b) => Block::BulletItem(BulletItem {
                spans: owned_spans(b.spans),
                lines: b.lines,
            }),
            Block::NumberedItem(n) => Block::NumberedItem(NumberedItem {
                ordinal: n.ordinal,
                spans: owned_spans(n.spans),
                lines: n.lines,
            }),
            Block::Table(t) => Block::Table(Table {
                header: owned_row(t.header),
                rows: t.rows.into_iter().map(owned_row).collect(),
                lines: t.lines,
            }),
            Block::Rule(lines) => Block::Rule(lines),
        }
    }
}

/// Heading depth. Only the three levels the export paths style are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
}

impl HeadingLevel {
    /// Numeric level, 1 through 3.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Section heading with level and inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: HeadingLevel,
    pub spans: Vec<Span<'a>>,
    pub lines: LineRange,
}

/// Prose paragraph (one source line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph<'a> {
    pub spans: Vec<Span<'a>>,
    pub lines: LineRange,
}

/// Bulleted list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletItem<'a> {
    pub spans: Vec<Span<'a>>,
    pub lines: LineRange,
}

/// Numbered list entry.
///
/// The ordinal is the number the author wrote, not a position in a list:
/// an item written `3.` keeps ordinal 3 even if it opens the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedItem<'a> {
    pub ordinal: u64,
    pub spans: Vec<Span<'a>>,
    pub lines: LineRange,
}

/// A table cell: inline content of one `|`-delimited fragment.
pub type Cell<'a> = Vec<Span<'a>>;

/// A table row. Rows keep the cell count of their source line.
pub type Row<'a> = Vec<Cell<'a>>;

/// Data table with header and body rows.
///
/// Rows are not padded or truncated to the header width; renderers that need
/// a rectangular grid must handle ragged rows themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<'a> {
    /// First row of the table.
    pub header: Row<'a>,
    /// Data rows, separator excluded.
    pub rows: Vec<Row<'a>>,
    /// Header, separator and data lines.
    pub lines: LineRange,
}

impl<'a> Table<'a> {
    /// Number of header cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Check if any data row has a different cell count than the header.
    pub fn is_ragged(&self) -> bool {
        self.rows.iter().any(|row| row.len() != self.header.len())
    }

    /// Header followed by data rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &Row<'a>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

/// Inline style of a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
}

/// A run of text with at most one style.
///
/// Code spans never carry bold or italic, whatever surrounds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: CowStr<'a>,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl<'a> Span<'a> {
    /// Create a span of the given style.
    pub fn new(text: impl Into<CowStr<'a>>, kind: SpanKind) -> Self {
        Self {
            text: text.into(),
            bold: kind == SpanKind::Bold,
            italic: kind == SpanKind::Italic,
            code: kind == SpanKind::Code,
        }
    }

    /// Unstyled text.
    #[inline]
    pub fn plain(text: impl Into<CowStr<'a>>) -> Self {
        Self::new(text, SpanKind::Plain)
    }

    #[inline]
    pub fn bold(text: impl Into<CowStr<'a>>) -> Self {
        Self::new(text, SpanKind::Bold)
    }

    #[inline]
    pub fn italic(text: impl Into<CowStr<'a>>) -> Self {
        Self::new(text, SpanKind::Italic)
    }

    #[inline]
    pub fn code(text: impl Into<CowStr<'a>>) -> Self {
        Self::new(text, SpanKind::Code)
    }

    /// The style of this span.
    pub fn kind(&self) -> SpanKind {
        if self.code {
            SpanKind::Code
        } else if self.bold {
            SpanKind::Bold
        } else if self.italic {
            SpanKind::Italic
        } else {
            SpanKind::Plain
        }
    }

    /// Check if the span carries no style.
    #[inline]
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.code
    }

    /// Detach the span from the input buffer.
    pub fn into_owned(self) -> Span<'static> {
        Span {
            text: CowStr::Owned(self.text.into_owned()),
            bold: self.bold,
            italic: self.italic,
            code: self.code,
        }
    }
}

/// Concatenate span text, dropping styles.
pub fn plain_text(spans: &[Span<'_>]) -> String {
    spans.iter().map(|s| s.text.as_ref()).collect()
}

fn owned_spans(spans: Vec<Span<'_>>) -> Vec<Span<'static>> {
    spans.into_iter().map(Span::into_owned).collect()
}

fn owned_row(row: Row<'_>) -> Row<'static> {
    row.into_iter().map(owned_spans).collect()
}
