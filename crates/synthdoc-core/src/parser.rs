//! Line-driven block parser for synthesis reports.
//!
//! One forward pass over the lines, with a single line of lookahead used
//! only while aggregating tables. Classification of each non-blank line, in
//! order:
//!
//! 1. `---` / `***` → [`Block::Rule`]
//! 2. table row that is not a separator → [`Block::Table`]
//! 3. `### `, `## `, `# ` → [`Block::Heading`]
//! 4. `- ` / `* ` → [`Block::BulletItem`]
//! 5. `N. text` → [`Block::NumberedItem`]
//! 6. anything else → [`Block::Paragraph`]
//!
//! Nothing is ever rejected: text that fits no rule becomes a paragraph.

use tracing::{debug, trace};

use crate::ast::{
    Block, BulletItem, Document, Heading, HeadingLevel, NumberedItem, Paragraph, Row, Table,
};
use crate::inline::{is_line_break, tokenize};
use crate::lexer::{Lexer, Line};
use crate::source::LineRange;
use crate::table::{is_table_row, is_table_separator, split_row};

/// Heading prefixes, longest first.
const HEADING_PREFIXES: [(&str, HeadingLevel); 3] = [
    ("### ", HeadingLevel::H3),
    ("## ", HeadingLevel::H2),
    ("# ", HeadingLevel::H1),
];

/// Parse report text into a document.
///
/// Total: every input, including the empty string, yields a document.
///
/// # Example
///
/// ```rust
/// use synthdoc_core::{parse, Block};
///
/// let doc = parse("# Findings\n\n- **Key** point");
/// assert_eq!(doc.len(), 2);
/// assert!(matches!(doc.blocks[1], Block::BulletItem(_)));
/// ```
#[inline]
pub fn parse(input: &str) -> Document<'_> {
    Parser::new(input).parse()
}

/// Block parser over one input text.
///
/// A parser is consumed by [`Parser::parse`]; build a new one per input.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    /// Parse the whole input.
    pub fn parse(mut self) -> Document<'a> {
        let blocks = self.parse_blocks();
        let line_count = self.lexer.lines_read();

        debug!(lines = line_count, blocks = blocks.len(), "parsed report");

        Document {
            blocks,
            lines: LineRange::new(0, line_count),
        }
    }

    #[inline]
    fn parse_blocks(&mut self) -> Vec<Block<'a>> {
        let mut blocks = Vec::with_capacity(16);

        while !self.lexer.is_eof() {
            self.lexer.skip_blank_lines();

            let Some(line) = self.lexer.next_line() else {
                break;
            };

            blocks.push(self.parse_block(line));
        }

        blocks
    }

    #[inline]
    fn parse_block(&mut self, line: Line<'a>) -> Block<'a> {
        let trimmed = line.trimmed();

        if trimmed == "---" || trimmed == "***" {
            return Block::Rule(line.range());
        }

        if is_table_row(trimmed) && !is_table_separator(trimmed) {
            return self.parse_table(line);
        }

        if let Some(block) = parse_heading(trimmed, line.range()) {
            return block;
        }

        if let Some(block) = parse_bullet_item(trimmed, line.range()) {
            return block;
        }

        if let Some(block) = parse_numbered_item(trimmed, line.range()) {
            return block;
        }

        Block::Paragraph(Paragraph {
            spans: tokenize(trimmed),
            lines: line.range(),
        })
    }

    /// Aggregate a table starting at `first`, which is always the header.
    fn parse_table(&mut self, first: Line<'a>) -> Block<'a> {
        let header = parse_row(first.trimmed());
        let mut lines = first.range();

        if let Some(&next) = self.lexer.peek_line() {
            if is_table_separator(next.text) {
                lines = lines.merge(next.range());
                self.lexer.next_line();
            }
        }

        let mut rows: Vec<Row<'a>> = Vec::with_capacity(8);

        while let Some(&next) = self.lexer.peek_line() {
            if !is_table_row(next.text) || is_table_separator(next.text) {
                break;
            }
            self.lexer.next_line();
            rows.push(parse_row(next.trimmed()));
            lines = lines.merge(next.range());
        }

        trace!(
            columns = header.len(),
            rows = rows.len(),
            start = lines.start,
            end = lines.end,
            "aggregated table"
        );

        Block::Table(Table {
            header,
            rows,
            lines,
        })
    }
}

#[inline]
fn parse_row(line: &str) -> Row<'_> {
    split_row(line).into_iter().map(tokenize).collect()
}

#[inline]
fn parse_heading(trimmed: &str, lines: LineRange) -> Option<Block<'_>> {
    HEADING_PREFIXES.iter().find_map(|&(prefix, level)| {
        trimmed.strip_prefix(prefix).map(|rest| {
            Block::Heading(Heading {
                level,
                spans: tokenize(rest.trim_start()),
                lines,
            })
        })
    })
}

#[inline]
fn parse_bullet_item(trimmed: &str, lines: LineRange) -> Option<Block<'_>> {
    let rest = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))?;

    Some(Block::BulletItem(BulletItem {
        spans: tokenize(rest.trim_start()),
        lines,
    }))
}

/// `digits "." whitespace+ text`, where text runs to the end of the line.
///
/// Digit runs that do not fit a `u64` are not list numbers.
#[inline]
fn parse_numbered_item(trimmed: &str, lines: LineRange) -> Option<Block<'_>> {
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let after_dot = trimmed[digits..].strip_prefix('.')?;
    if !after_dot.starts_with(char::is_whitespace) {
        return None;
    }

    let text = after_dot.trim_start();
    if text.is_empty() || text.chars().any(is_line_break) {
        return None;
    }

    let ordinal = trimmed[..digits].parse::<u64>().ok()?;

    Some(Block::NumberedItem(NumberedItem {
        ordinal,
        spans: tokenize(text),
        lines,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn numbered_item_requires_whitespace_after_dot() {
        assert!(parse_numbered_item("1.x", LineRange::single(0)).is_none());
        assert!(parse_numbered_item("1.", LineRange::single(0)).is_none());
        assert!(parse_numbered_item(". x", LineRange::single(0)).is_none());
    }

    #[test]
    fn numbered_item_skips_extra_whitespace() {
        let block = parse_numbered_item("12.\t  Twelve", LineRange::single(4)).unwrap();
        assert_eq!(
            block,
            Block::NumberedItem(NumberedItem {
                ordinal: 12,
                spans: vec![Span::plain("Twelve")],
                lines: LineRange::single(4),
            })
        );
    }

    #[test]
    fn oversized_ordinal_is_not_a_list_number() {
        let line = "99999999999999999999999. too big";
        assert!(parse_numbered_item(line, LineRange::single(0)).is_none());
    }

    #[test]
    fn heading_prefix_needs_space() {
        assert!(parse_heading("#Title", LineRange::single(0)).is_none());
        assert!(parse_heading("#### Deep", LineRange::single(0)).is_none());
        let block = parse_heading("## Two", LineRange::single(0)).unwrap();
        assert!(matches!(
            block,
            Block::Heading(Heading {
                level: HeadingLevel::H2,
                ..
            })
        ));
    }
}
