// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Offset to LSP position conversion.
//!
//! The checker reports a flat offset and length counted in UTF-16 code
//! units over the whole text. Editors want (line, character) pairs, which
//! LSP also counts in UTF-16 code units, so each line's length is measured
//! the same way.

use tower_lsp::lsp_types::{Position, Range};

/// Split text into lines on `\n`.
///
/// A trailing newline yields a final empty line. A `\r` before the `\n`
/// stays part of the line, so it still counts toward the offset walk.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Length of a line in UTF-16 code units.
pub fn utf16_len(line: &str) -> usize {
    line.encode_utf16().count()
}

/// Map a flat (offset, length) onto a range within `lines`.
///
/// Never fails: an offset past the end lands on the last line with the
/// leftover as its character. The end is `start.character + length` on the
/// start line, even when the span really continues onto the next line.
pub fn offset_to_range(lines: &[&str], offset: usize, length: usize) -> Range {
    let last = lines.len().saturating_sub(1);
    let mut line = 0usize;
    let mut remainder = offset;

    while let Some(text) = lines.get(line) {
        let len = utf16_len(text);
        if remainder < len {
            break;
        }
        remainder -= len;
        if line == last {
            break;
        }
        // The line break itself.
        remainder = remainder.saturating_sub(1);
        line += 1;
    }

    // Offsets and lengths come from the service, so clamp instead of wrapping.
    let line = u32::try_from(line).unwrap_or(u32::MAX);
    let character = u32::try_from(remainder).unwrap_or(u32::MAX);
    let end_character = character.saturating_add(u32::try_from(length).unwrap_or(u32::MAX));

    Range::new(Position::new(line, character), Position::new(line, end_character))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(text: &str, offset: usize, length: usize) -> Range {
        offset_to_range(&split_lines(text), offset, length)
    }

    fn r(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn test_split_lines_keeps_trailing_empty_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("\nx"), vec!["", "x"]);
    }

    #[test]
    fn test_first_line() {
        assert_eq!(range("Apffelstaft\n", 0, 10), r(0, 0, 0, 10));
    }

    #[test]
    fn test_leading_line_break_is_skipped() {
        assert_eq!(range("\nApffelstaft", 0, 10), r(1, 0, 1, 10));
    }

    #[test]
    fn test_later_line() {
        // "are" in the second line: 11 chars + newline + "This "
        let text = "Hello world\nThis are bad\n";
        assert_eq!(range(text, 17, 3), r(1, 5, 1, 8));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(range("", 0, 0), r(0, 0, 0, 0));
    }

    #[test]
    fn test_offset_past_end_saturates_on_last_line() {
        assert_eq!(range("ab\ncd", 10, 1), r(1, 5, 1, 6));
    }

    #[test]
    fn test_huge_length_clamps_end() {
        assert_eq!(range("hello world", 5, u32::MAX as usize), r(0, 5, 0, u32::MAX));
        assert_eq!(range("hello world", 5, usize::MAX), r(0, 5, 0, u32::MAX));
        assert_eq!(range("ab\ncd", usize::MAX, 1), r(1, u32::MAX, 1, u32::MAX));
    }

    #[test]
    fn test_offset_at_final_newline() {
        assert_eq!(range("Apffelstaft\n", 11, 0), r(1, 0, 1, 0));
    }

    #[test]
    fn test_span_crossing_line_break_is_not_rewalked() {
        // "cd\nef" starting at offset 3 runs onto the next line
        let got = range("ab cd\nef", 3, 5);
        assert_eq!(got, r(0, 3, 0, 8));
    }

    #[test]
    fn test_crlf_counts_carriage_return() {
        assert_eq!(range("ab\r\ncd", 4, 2), r(1, 0, 1, 2));
    }

    #[test]
    fn test_utf16_units() {
        // Each emoji is a surrogate pair.
        assert_eq!(range("😀😀\nteh", 5, 3), r(1, 0, 1, 3));
        assert_eq!(range("ü teh", 2, 3), r(0, 2, 0, 5));
    }

    #[test]
    fn test_start_never_past_last_line() {
        let text = "one\n\ntwo three\nfour\n";
        let lines = split_lines(text);
        for offset in 0..=utf16_len(text) {
            let got = offset_to_range(&lines, offset, 1);
            assert!((got.start.line as usize) < lines.len(), "offset {offset}");
            assert!(got.start <= got.end);
            assert_eq!(got.start.line, got.end.line);
        }
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let lines = split_lines("x\ny z\n");
        assert_eq!(offset_to_range(&lines, 4, 1), offset_to_range(&lines, 4, 1));
    }
}
