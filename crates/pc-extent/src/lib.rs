//! Scanning a text file to learn the terminal geometry a full-screen editor
//! would need to render it without wrapping or scrolling: its row count and
//! the width of its widest row.
//!
//! Width is counted in bytes, not decoded Unicode scalars — this
//! over-counts multi-byte UTF-8 sequences, but only ever in the direction of
//! requesting a wider terminal than strictly necessary, which is harmless.
//! A tab always counts for 8 columns regardless of its actual column
//! position, matching a fixed tab stop rather than the variable one a real
//! terminal would compute.

#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

fn peek_byte(reader: &mut impl BufRead) -> io::Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

fn read_byte(reader: &mut impl BufRead) -> io::Result<Option<u8>> {
    match peek_byte(reader)? {
        Some(b) => {
            reader.consume(1);
            Ok(Some(b))
        }
        None => Ok(None),
    }
}

/// Scan `path`, returning `(rows, columns)`.
///
/// `limit` caps how many rows are scanned before giving up early (useful
/// when only a single line's highlighting was requested and the rest of a
/// large file is irrelevant); `0` means scan the whole file.
pub fn extent(path: impl AsRef<Path>, limit: usize) -> io::Result<(usize, usize)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut lines: usize = 1;
    let mut width: usize = 0;
    let mut max_width: usize = 0;
    let mut last: Option<u8> = None;

    loop {
        if limit != 0 && lines > limit {
            break;
        }

        let Some(c) = read_byte(&mut reader)? else {
            break;
        };
        last = Some(c);

        if c == b'\n' {
            lines += 1;
            max_width = max_width.max(width);
            width = 0;
            continue;
        }

        if c == b'\r' {
            if peek_byte(&mut reader)? == Some(b'\n') {
                reader.consume(1);
                lines += 1;
                max_width = max_width.max(width);
                width = 0;
                continue;
            }
            // a bare CR is an ordinary one-column character, not a break.
        }

        if c == b'\t' {
            width += 8;
            continue;
        }

        width += 1;
    }

    max_width = max_width.max(width);

    // a trailing line break does not introduce an additional (empty) row.
    if last == Some(b'\n') {
        lines -= 1;
    }

    Ok((lines, max_width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    fn scratch_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn empty_file() {
        let f = scratch_file(b"");
        assert_eq!(extent(f.path(), 0).unwrap(), (1, 0));
    }

    #[test]
    fn file_ending_in_lf_does_not_count_trailing_empty_row() {
        let f = scratch_file(b"hello\n");
        assert_eq!(extent(f.path(), 0).unwrap(), (1, 5));
    }

    #[test]
    fn tab_counts_as_eight_columns() {
        let f = scratch_file(b"a\tb");
        assert_eq!(extent(f.path(), 0).unwrap(), (1, 10));
    }

    #[test]
    fn crlf_is_a_single_row_break() {
        let f = scratch_file(b"a\r\nb");
        assert_eq!(extent(f.path(), 0).unwrap(), (2, 1));
    }

    #[test]
    fn bare_cr_is_not_a_row_break() {
        let f = scratch_file(b"a\rb");
        assert_eq!(extent(f.path(), 0).unwrap(), (1, 3));
    }

    #[test]
    fn multiple_rows_report_the_widest() {
        let f = scratch_file(b"a\nbbbbb\ncc\n");
        assert_eq!(extent(f.path(), 0).unwrap(), (3, 5));
    }

    #[test]
    fn limit_stops_scanning_early() {
        let f = scratch_file(b"a\nbbbbbbbbbb\ncc\ndd\n");
        // only the first two rows are scanned, so the wide third row never
        // contributes to the reported width.
        let (rows, columns) = extent(f.path(), 2).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(columns, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(extent("/nonexistent/path/does-not-exist", 0).is_err());
    }
}
