//! The highlight loop: the crate's one published operation, tying together
//! the extent scanner, the editor driver, and the virtual terminal.

use std::io::Read;
use std::num::NonZeroUsize;
use std::ops::ControlFlow;
use std::path::Path;

use pc_term::Term;

use crate::debug::debug_line;
use crate::error::HighlightError;

/// The editor caps its internal geometry at roughly this many rows; files
/// taller than this are covered by successive tiles, each scrolled further
/// down and re-rendered from scratch.
const MAX_TILE_ROWS: usize = 999;

/// Render every row of `path`, handing each ANSI-annotated line to
/// `callback` in order.
///
/// Returns `Ok(0)` if every callback call returned
/// `ControlFlow::Continue(())`; returns `Ok(n)` with the most recent
/// `ControlFlow::Break(n)` value the moment the callback breaks (no further
/// rows are rendered after that point).
///
/// # Errors
///
/// Returns [`HighlightError`] if the file cannot be scanned, the editor
/// fails to spawn or exits abnormally, or the editor's output cannot be
/// parsed as a valid byte stream.
pub fn highlight<F>(path: &Path, callback: F) -> Result<i32, HighlightError>
where
    F: FnMut(&str) -> ControlFlow<i32>,
{
    run(path, 0, callback)
}

/// Render a single 1-indexed row of `path` and return it as an owned,
/// ANSI-annotated string.
///
/// `lineno` is a `NonZeroUsize`, so the zero-lineno case the C API rejects
/// with `EINVAL` is unrepresentable here rather than a runtime check.
///
/// # Errors
///
/// Returns [`HighlightError::OutOfRange`] if `lineno` exceeds the file's row
/// count, or any of the errors documented on [`highlight`].
pub fn highlight_line(path: &Path, lineno: NonZeroUsize) -> Result<String, HighlightError> {
    let mut line = String::new();
    run(path, lineno.get(), |row| {
        line = row.to_string();
        ControlFlow::Continue(())
    })?;
    Ok(line)
}

/// Probe `PATH` to confirm the editor binary is reachable.
#[must_use]
pub fn have_editor() -> bool {
    which::which(pc_driver::EDITOR_BIN).is_ok()
}

fn clamp_term_cols(file_cols: usize) -> u32 {
    u32::try_from(file_cols)
        .unwrap_or(u32::MAX)
        .clamp(pc_driver::MIN_COLS, pc_driver::MAX_COLS)
}

fn clamp_term_rows(value: usize) -> u32 {
    u32::try_from(value)
        .unwrap_or(u32::MAX)
        .clamp(2, pc_driver::MAX_ROWS)
}

fn run<F>(path: &Path, lineno: usize, mut callback: F) -> Result<i32, HighlightError>
where
    F: FnMut(&str) -> ControlFlow<i32>,
{
    let (scanned_rows, file_cols) = pc_extent::extent(path, lineno)?;

    if lineno > 0 && lineno > scanned_rows {
        return Err(HighlightError::OutOfRange);
    }

    let file_rows = if lineno > 0 { lineno } else { scanned_rows };
    let term_rows = if lineno > 0 {
        2
    } else {
        clamp_term_rows(file_rows + 1)
    };
    let term_cols = clamp_term_cols(file_cols);

    let mut term = Term::new(term_cols as usize, term_rows as usize)?;

    let mut row = if lineno > 0 { lineno } else { 1 };
    let mut first_tile = true;

    while row <= file_rows {
        if !first_tile {
            term.reset();
        }
        first_tile = false;

        let tile_rows = (file_rows - row + 1).min(MAX_TILE_ROWS);

        debug_line!("rendering rows {row}..={} of {}", row + tile_rows - 1, path.display());

        let mut editor = pc_driver::spawn(path, term_rows, term_cols, row)?;
        let send_result = stream_into(&mut term, editor.stdout());
        let wait_result = editor.wait();

        // Always reap the child before propagating whichever error came
        // first, mirroring the original driver's unconditional `waitpid` on
        // every exit path.
        send_result?;
        let status = wait_result?;
        if !status.success() {
            return Err(HighlightError::EditorFailed(status));
        }

        for y in 1..=tile_rows {
            let line = term.read_line(y);
            if let ControlFlow::Break(n) = callback(line) {
                return Ok(n);
            }
        }

        row += tile_rows;
    }

    Ok(0)
}

fn stream_into(term: &mut Term, mut stdout: impl Read) -> Result<(), HighlightError> {
    match term.send(&mut stdout) {
        Ok(()) => Ok(()),
        Err(e) => {
            // Drain whatever the editor still has buffered so the pipe
            // doesn't block the child on a full buffer while we go on to
            // `wait` for it.
            let mut sink = std::io::sink();
            let _ = std::io::copy(&mut stdout, &mut sink);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clamp_term_cols_enforces_minimum() {
        assert_eq!(clamp_term_cols(10), pc_driver::MIN_COLS);
    }

    #[test]
    fn clamp_term_cols_enforces_maximum() {
        assert_eq!(clamp_term_cols(50_000), pc_driver::MAX_COLS);
    }

    #[test]
    fn clamp_term_rows_enforces_minimum_of_two() {
        assert_eq!(clamp_term_rows(1), 2);
        assert_eq!(clamp_term_rows(0), 2);
    }

    #[test]
    fn clamp_term_rows_enforces_maximum() {
        assert_eq!(clamp_term_rows(5_000), pc_driver::MAX_ROWS);
    }
}
