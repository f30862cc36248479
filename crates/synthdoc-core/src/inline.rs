//! Inline span tokenizer.
//!
//! Splits one line of prose into flat [`Span`]s. Five delimiter pairs are
//! recognized, tried in this priority order:
//!
//! | open/close | style  |
//! |------------|--------|
//! | `**`       | bold   |
//! | `__`       | bold   |
//! | `*`        | italic |
//! | `_`        | italic |
//! | `` ` ``    | code   |
//!
//! Each pass finds the leftmost match of every pair in the unconsumed text
//! and takes the one starting first; on a tie the pair listed first wins.
//! Inner text must be non-empty and is matched lazily, so `**a** and **b**`
//! gives two bold spans. Matched inner text is not re-scanned: spans never
//! nest, and markers inside a match stay literal.

use memchr::memmem;

use crate::ast::{plain_text, Span, SpanKind};

/// One delimiter pair of the inline grammar.
#[derive(Debug, Clone, Copy)]
struct Delimiter {
    kind: SpanKind,
    open: &'static str,
    close: &'static str,
}

/// Delimiter pairs in priority order.
const DELIMITERS: [Delimiter; 5] = [
    Delimiter {
        kind: SpanKind::Bold,
        open: "**",
        close: "**",
    },
    Delimiter {
        kind: SpanKind::Bold,
        open: "__",
        close: "__",
    },
    Delimiter {
        kind: SpanKind::Italic,
        open: "*",
        close: "*",
    },
    Delimiter {
        kind: SpanKind::Italic,
        open: "_",
        close: "_",
    },
    Delimiter {
        kind: SpanKind::Code,
        open: "`",
        close: "`",
    },
];

/// A delimiter match, in byte offsets relative to the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    kind: SpanKind,
    /// Offset of the opening delimiter.
    start: usize,
    /// Offset of the first inner byte.
    inner_start: usize,
    /// Offset of the closing delimiter.
    inner_end: usize,
    /// Offset just past the closing delimiter.
    end: usize,
}

/// Tokenize a line into styled spans.
///
/// Total over any input: unmatched markers stay in plain spans, and a line
/// that yields nothing (the empty line) becomes one plain span holding the
/// line itself.
///
/// # Example
///
/// ```rust
/// use synthdoc_core::{inline::tokenize, Span};
///
/// let spans = tokenize("**a** _b_");
/// assert_eq!(spans, vec![Span::bold("a"), Span::plain(" "), Span::italic("b")]);
/// ```
pub fn tokenize(line: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::with_capacity(4);
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        match earliest_match(rest) {
            Some(m) => {
                if m.start > 0 {
                    spans.push(Span::plain(&rest[..m.start]));
                }
                spans.push(Span::new(&rest[m.inner_start..m.inner_end], m.kind));
                pos += m.end;
            }
            None => {
                spans.push(Span::plain(rest));
                break;
            }
        }
    }

    if spans.is_empty() {
        spans.push(Span::plain(line));
    }

    spans
}

/// The line's text with every matched delimiter pair removed.
///
/// This is the marker-free text a renderer without inline styling prints.
pub fn strip_markers(line: &str) -> String {
    plain_text(&tokenize(line))
}

/// Leftmost match over all delimiters; ties go to the earlier delimiter.
#[inline]
fn earliest_match(text: &str) -> Option<Match> {
    let mut best: Option<Match> = None;
    for delim in &DELIMITERS {
        if let Some(m) = find_match(text, delim) {
            if best.map_or(true, |b| m.start < b.start) {
                best = Some(m);
            }
        }
    }
    best
}

/// Leftmost lazy match of one delimiter pair.
fn find_match(text: &str, delim: &Delimiter) -> Option<Match> {
    let bytes = text.as_bytes();
    let open = delim.open.as_bytes();
    let close = delim.close.as_bytes();
    let mut from = 0;

    while let Some(offset) = memmem::find(&bytes[from..], open) {
        let start = from + offset;
        let inner_start = start + open.len();

        match find_close(text, inner_start, close) {
            Close::Found(inner_end) => {
                return Some(Match {
                    kind: delim.kind,
                    start,
                    inner_start,
                    inner_end,
                    end: inner_end + close.len(),
                });
            }
            // Any later opener would need a closer even further right.
            Close::Exhausted => return None,
            Close::Blocked => {}
        }

        // Delimiters are ASCII, so `start + 1` is a char boundary.
        from = start + 1;
    }

    None
}

enum Close {
    /// Closing delimiter at this offset.
    Found(usize),
    /// A line break or end of text came before any usable closer.
    Blocked,
    /// No closing delimiter anywhere after the opener.
    Exhausted,
}

/// Find the nearest closer leaving at least one inner character.
fn find_close(text: &str, inner_start: usize, close: &[u8]) -> Close {
    let first = match text[inner_start..].chars().next() {
        Some(c) if !is_line_break(c) => c,
        _ => return Close::Blocked,
    };
    let search_from = inner_start + first.len_utf8();

    match memmem::find(&text.as_bytes()[search_from..], close) {
        Some(offset) => {
            let inner_end = search_from + offset;
            if text[inner_start..inner_end].chars().any(is_line_break) {
                Close::Blocked
            } else {
                Close::Found(inner_end)
            }
        }
        None => Close::Exhausted,
    }
}

/// Characters inner text may not cross.
#[inline(always)]
pub(crate) fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(spans: &[Span<'_>]) -> Vec<(SpanKind, String)> {
        spans
            .iter()
            .map(|s| (s.kind(), s.text.to_string()))
            .collect()
    }

    #[test]
    fn bold_wins_tie_against_italic() {
        // `*` also matches at offset 0 with inner text "*a".
        let m = earliest_match("**a**").unwrap();
        assert_eq!(m.kind, SpanKind::Bold);
        assert_eq!((m.inner_start, m.inner_end, m.end), (2, 3, 5));
    }

    #[test]
    fn triple_star_keeps_inner_star() {
        assert_eq!(
            kinds(&tokenize("***a***")),
            vec![
                (SpanKind::Bold, "*a".to_string()),
                (SpanKind::Plain, "*".to_string()),
            ]
        );
    }

    #[test]
    fn empty_inner_text_is_not_a_match() {
        assert_eq!(tokenize("``"), vec![Span::plain("``")]);
        assert_eq!(tokenize("a ** b"), vec![Span::plain("a ** b")]);
        // The inner text may itself be a delimiter character.
        assert_eq!(tokenize("````"), vec![Span::code("`"), Span::plain("`")]);
    }

    #[test]
    fn inner_text_does_not_cross_line_breaks() {
        assert_eq!(tokenize("*a\nb*"), vec![Span::plain("*a\nb*")]);
    }

    #[test]
    fn blocked_opener_does_not_hide_later_match() {
        assert_eq!(
            kinds(&tokenize("`a\n`b`")),
            vec![
                (SpanKind::Plain, "`a\n".to_string()),
                (SpanKind::Code, "b".to_string()),
            ]
        );
    }

    #[test]
    fn multibyte_inner_text() {
        assert_eq!(
            tokenize("naïve *café* ✓"),
            vec![Span::plain("naïve "), Span::italic("café"), Span::plain(" ✓")]
        );
    }

    #[test]
    fn strip_markers_keeps_unmatched() {
        assert_eq!(strip_markers("**bold** and `code` and *open"), "bold and code and *open");
    }
}
