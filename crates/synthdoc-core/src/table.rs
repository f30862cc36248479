//! Pipe-table line classification.
//!
//! A report table is a header row, an optional separator row, and any number
//! of data rows:
//!
//! ```text
//! | Source | Score |
//! |--------|:-----:|
//! | arXiv  | 0.91  |
//! ```
//!
//! Leading and trailing pipe fences are optional. Empty fragments between
//! pipes are discarded, so `| a || b |` has two cells.

use memchr::memchr;

/// Check if a line is a table row: it contains `|` and at least one
/// non-empty cell.
///
/// A lone `|` is not a row.
#[inline]
pub fn is_table_row(line: &str) -> bool {
    has_pipe(line) && cells(line).next().is_some()
}

/// Check if a line is a header/body separator such as `|---|:---:|`.
///
/// The line must contain `|` and nothing but `|`, `-`, `:` and whitespace.
#[inline]
pub fn is_table_separator(line: &str) -> bool {
    has_pipe(line)
        && line
            .chars()
            .all(|c| c == '|' || c == '-' || c == ':' || c.is_whitespace())
}

/// Split a row into trimmed, non-empty cell texts.
pub fn split_row(line: &str) -> Vec<&str> {
    cells(line).collect()
}

#[inline(always)]
fn has_pipe(line: &str) -> bool {
    memchr(b'|', line.as_bytes()).is_some()
}

#[inline(always)]
fn cells(line: &str) -> impl Iterator<Item = &str> {
    line.split('|').map(str::trim).filter(|cell| !cell.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_row() {
        assert!(is_table_row("| a | b |"));
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
    }

    #[test]
    fn unfenced_row() {
        assert!(is_table_row("a | b"));
        assert_eq!(split_row("a | b"), vec!["a", "b"]);
    }

    #[test]
    fn empty_fragments_are_dropped() {
        assert_eq!(split_row("|| a ||  | b |"), vec!["a", "b"]);
    }

    #[test]
    fn lone_pipe_is_not_a_row() {
        assert!(!is_table_row("|"));
        assert!(!is_table_row(" |  | "));
        assert!(split_row("|").is_empty());
    }

    #[test]
    fn line_without_pipe_is_neither() {
        assert!(!is_table_row("plain text"));
        assert!(!is_table_separator("---"));
    }

    #[test]
    fn separators() {
        assert!(is_table_separator("|---|---|"));
        assert!(is_table_separator("| :--- | ---: | :-: |"));
        assert!(is_table_separator("|"));
        assert!(!is_table_separator("|---|x--|"));
    }

    #[test]
    fn separator_also_passes_row_check() {
        // Separators do count as rows; callers check both predicates.
        assert!(is_table_row("|---|---|"));
        assert!(is_table_separator("|---|---|"));
    }
}
