//! Line-based lexer with SIMD-accelerated scanning.
//!
//! The lexer splits report text into numbered lines for the block parser.
//! It uses `memchr` for fast newline detection (SIMD on supported platforms).
//!
//! # Behavior
//!
//! - Zero-copy: lines borrow directly from input
//! - A `\r` before `\n` is dropped, so CRLF input lexes like LF input
//! - A leading byte order mark is skipped
//! - Line numbers are `u32`; past `u32::MAX` lines they saturate
//! - Peek/consume API gives the parser its single line of lookahead

use memchr::memchr;

use crate::source::LineRange;

/// A single line from the input with its zero-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without trailing newline).
    pub text: &'a str,
    /// Zero-based position of this line in the input.
    pub number: u32,
}

impl<'a> Line<'a> {
    /// Check if this line contains only whitespace.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Get the line text with leading/trailing whitespace removed.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// The one-line range this line occupies.
    #[inline(always)]
    pub fn range(&self) -> LineRange {
        LineRange::single(self.number)
    }
}

/// Line-based lexer for the block parser.
pub struct Lexer<'a> {
    /// The complete input text.
    input: &'a str,
    /// Current byte offset.
    offset: usize,
    /// Number assigned to the next line read from input.
    next_number: u32,
    /// Peeked line (for lookahead).
    peeked: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.strip_prefix('\u{FEFF}').unwrap_or(input),
            offset: 0,
            next_number: 0,
            peeked: None,
        }
    }

    /// Number of lines handed out or peeked so far.
    #[inline(always)]
    pub fn lines_read(&self) -> u32 {
        self.next_number
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.peeked.is_none() && self.offset >= self.input.len()
    }

    /// Peek at the next line without consuming it.
    ///
    /// Returns `None` if at end of input.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
        }
        self.peeked.as_ref()
    }

    /// Consume and return the next line.
    ///
    /// Returns `None` if at end of input.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if let Some(line) = self.peeked.take() {
            return Some(line);
        }
        self.read_line()
    }

    /// Skip blank lines and return the count skipped.
    #[inline]
    pub fn skip_blank_lines(&mut self) -> usize {
        let mut count = 0;
        while let Some(line) = self.peek_line() {
            if !line.is_blank() {
                break;
            }
            self.next_line();
            count += 1;
        }
        count
    }

    #[inline(always)]
    fn read_line(&mut self) -> Option<Line<'a>> {
        let bytes = self.input.as_bytes();
        if self.offset >= bytes.len() {
            return None;
        }

        let start = self.offset;

        let end = match memchr(b'\n', &bytes[start..]) {
            Some(pos) => start + pos,
            None => bytes.len(),
        };

        let text_end = if end > start && bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < bytes.len() { end + 1 } else { end };

        let number = self.next_number;
        self.next_number = self.next_number.saturating_add(1);

        // `\n` and `\r` are ASCII, so both ends sit on char boundaries.
        Some(Line {
            text: &self.input[start..text_end],
            number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_lines_in_order() {
        let mut lexer = Lexer::new("one\ntwo\n\nfour");
        let lines: Vec<_> = std::iter::from_fn(|| lexer.next_line()).collect();
        let numbered: Vec<_> = lines.iter().map(|l| (l.number, l.text)).collect();
        assert_eq!(numbered, vec![(0, "one"), (1, "two"), (2, ""), (3, "four")]);
    }

    #[test]
    fn strips_carriage_return() {
        let mut lexer = Lexer::new("# Title\r\nbody\r\n");
        assert_eq!(lexer.next_line().map(|l| l.text), Some("# Title"));
        assert_eq!(lexer.next_line().map(|l| l.text), Some("body"));
        assert!(lexer.next_line().is_none());
        assert!(lexer.is_eof());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("a\nb");
        assert_eq!(lexer.peek_line().map(|l| l.number), Some(0));
        assert_eq!(lexer.peek_line().map(|l| l.number), Some(0));
        assert_eq!(lexer.next_line().map(|l| l.text), Some("a"));
        assert_eq!(lexer.next_line().map(|l| l.text), Some("b"));
    }

    #[test]
    fn skip_blank_lines_counts_whitespace_only_lines() {
        let mut lexer = Lexer::new("\n  \n\t\ntext");
        assert_eq!(lexer.skip_blank_lines(), 3);
        assert_eq!(lexer.next_line().map(|l| l.number), Some(3));
    }

    #[test]
    fn skips_byte_order_mark() {
        let mut lexer = Lexer::new("\u{FEFF}# Title\nbody");
        assert_eq!(lexer.next_line().map(|l| l.text), Some("# Title"));
        assert_eq!(lexer.next_line().map(|l| l.number), Some(1));

        let mut bom_only = Lexer::new("\u{FEFF}");
        assert!(bom_only.is_eof());
        assert!(bom_only.next_line().is_none());
    }

    #[test]
    fn line_numbers_saturate() {
        let mut lexer = Lexer::new("a\nb");
        lexer.next_number = u32::MAX;
        assert_eq!(lexer.next_line().map(|l| l.number), Some(u32::MAX));
        assert_eq!(lexer.next_line().map(|l| l.number), Some(u32::MAX));
        assert_eq!(lexer.lines_read(), u32::MAX);
    }

    #[test]
    fn empty_input_has_no_lines() {
        let mut lexer = Lexer::new("");
        assert!(lexer.is_eof());
        assert!(lexer.peek_line().is_none());
        assert_eq!(lexer.lines_read(), 0);
    }
}
