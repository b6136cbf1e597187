//! The error type returned by the highlighting driver.
//!
//! Kept as a single hand-written enum implementing `std::error::Error`,
//! matching `vtansi::parse::ParseError`'s convention in the teacher
//! workspace, rather than reaching for a derive-macro crate.

use std::fmt;
use std::io;
use std::process::ExitStatus;

use pc_term::TermError;

/// Everything that can go wrong while highlighting a file.
#[derive(Debug)]
pub enum HighlightError {
    /// `lineno` was requested beyond the file's last row.
    OutOfRange,
    /// The virtual terminal rejected a byte stream from the editor.
    Term(TermError),
    /// Spawning, reading from, or waiting on the editor subprocess failed.
    Io(io::Error),
    /// The editor exited with a non-zero or abnormal status.
    EditorFailed(ExitStatus),
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightError::OutOfRange => {
                write!(f, "requested line is beyond the end of the file")
            }
            HighlightError::Term(e) => write!(f, "terminal error: {e}"),
            HighlightError::Io(e) => write!(f, "i/o error: {e}"),
            HighlightError::EditorFailed(status) => {
                write!(f, "editor exited with {status}")
            }
        }
    }
}

impl std::error::Error for HighlightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HighlightError::Term(e) => Some(e),
            HighlightError::Io(e) => Some(e),
            HighlightError::OutOfRange | HighlightError::EditorFailed(_) => None,
        }
    }
}

impl From<io::Error> for HighlightError {
    fn from(e: io::Error) -> Self {
        HighlightError::Io(e)
    }
}

impl From<TermError> for HighlightError {
    fn from(e: TermError) -> Self {
        HighlightError::Term(e)
    }
}
