//! The embedded manual page, shown via the platform `man` command.
//!
//! The page is written to a temporary file rather than piped to `man`
//! directly, since `man` expects a seekable file (or at least a real path)
//! to apply its own pager and formatting around.

use std::io::{self, Write};
use std::process::Command;

const PAGE: &str = r#".TH PAGECAT 1 "" "pagecat" "User Commands"
.SH NAME
pagecat \- render a file exactly as Vim would display it
.SH SYNOPSIS
.B pagecat
[\fB\-c\fR \fIwhen\fR]
[\fB\-d\fR]
[\fB\-h\fR]
[\fB\-v\fR]
\fIfile\fR ...
.SH DESCRIPTION
.B pagecat
opens each
.I file
read-only in Vim under a forged terminal geometry, captures the rendered
screen (including syntax highlighting), and prints it to standard output as
ANSI-annotated text.
.SH OPTIONS
.TP
\fB\-c\fR, \fB\-\-colour\fR \fIwhen\fR
When to keep color escape sequences: \fBalways\fR, \fBauto\fR (the
default; strips color when \fBNO_COLOR\fR is set), or \fBnever\fR.
.TP
\fB\-d\fR, \fB\-\-debug\fR
Enable the library's debug sink, writing to standard error.
.TP
\fB\-h\fR, \fB\-\-help\fR
Show this manual page.
.TP
\fB\-v\fR, \fB\-\-version\fR
Print the version and exit.
.SH CONSENT
.B pagecat
runs Vim as a subprocess on every file passed to it. Before it will do so,
the user must create \fI$HOME/.pagecatrc\fR to acknowledge this.
.SH EXIT STATUS
0 on success, non-zero on any failure.
"#;

/// Write the embedded manual page to a temporary file and hand it to `man`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or
/// if `man` cannot be spawned.
pub fn show() -> io::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".1").tempfile()?;
    file.write_all(PAGE.as_bytes())?;
    file.flush()?;

    let status = Command::new("man").arg(file.path()).status()?;
    if !status.success() {
        return Err(io::Error::other(format!("man exited with {status}")));
    }
    Ok(())
}
