//! # synthdoc core
//!
//! A deterministic parser for the markdown subset found in research
//! synthesis reports.
//!
//! Reports are turned into a flat, renderer-agnostic [`Document`]: headings,
//! paragraphs, bullet and numbered items, pipe tables and rules, each holding
//! inline [`Span`]s (plain, bold, italic, code). Both export paths (paged and
//! flowing) consume the same model and decide presentation themselves.
//!
//! ## Quick Start
//!
//! ```rust
//! use synthdoc_core::{parse, Block};
//!
//! let input = "# Summary\n\nThe **main** finding.\n\n| Source | Score |\n|---|---|\n| arXiv | 0.9 |";
//! let doc = parse(input);
//!
//! assert_eq!(doc.len(), 3);
//! if let Block::Table(table) = &doc.blocks[2] {
//!     assert_eq!(table.width(), 2);
//!     assert_eq!(table.rows.len(), 1);
//! }
//! ```
//!
//! ## Totality
//!
//! There is no error type. Malformed markup degrades instead of failing:
//!
//! ```rust
//! use synthdoc_core::{parse, Block};
//!
//! let doc = parse("#Not a heading with **unclosed bold");
//! assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
//! assert!(parse("").is_empty());
//! ```

pub mod ast;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod table;

pub use ast::{
    Block, BlockKind, BulletItem, Cell, Document, Heading, HeadingLevel, NumberedItem,
    Paragraph, Row, Span, SpanKind, Table,
};
pub use inline::{strip_markers, tokenize};
pub use parser::{parse, Parser};
pub use source::LineRange;
