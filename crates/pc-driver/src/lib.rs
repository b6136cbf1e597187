//! Spawning Vim as a subprocess under a forged terminal geometry and
//! capturing its rendered standard output.
//!
//! This replaces the C implementation's hand-rolled `pipe()` /
//! `posix_spawn_file_actions_*` / `fcntl(F_SETFD, FD_CLOEXEC)` dance:
//! `std::process::Command` already performs the equivalent of that setup
//! (piped stdout, close-on-exec by default on owned descriptors) with no
//! manual `fcntl` call needed for parity.

#![warn(clippy::pedantic)]

use std::io;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

/// The editor binary this driver targets. Resolved through `PATH` the same
/// way `posix_spawnp` resolves `"vim"`.
pub const EDITOR_BIN: &str = "vim";

/// Smallest and largest terminal geometry the driver will force on the
/// editor. `term_cols` is clamped to `[MIN_COLS, MAX_COLS]` and `term_rows`
/// to `[1, MAX_ROWS]` by callers before reaching [`spawn`].
pub const MIN_COLS: u32 = 80;
pub const MAX_COLS: u32 = 10_000;
pub const MAX_ROWS: u32 = 1000;

/// The maximum number of `+`-prefixed Vim command-line directives this
/// driver will ever build, mirroring the original implementation's
/// `assert(commands <= 10 && "too many commands for Vim to handle")`.
const MAX_DIRECTIVES: usize = 10;

/// A spawned editor subprocess: its standard output pipe, ready to be
/// streamed into a [`pc_term::Term`], and the underlying child so the caller
/// can reap it once streaming completes.
pub struct EditorProcess {
    child: Child,
    stdout: ChildStdout,
}

impl EditorProcess {
    /// The pipe end connected to the editor's standard output.
    pub fn stdout(&mut self) -> &mut ChildStdout {
        &mut self.stdout
    }

    /// Block until the editor exits, reaping it.
    ///
    /// Every call site of [`spawn`] must reach a `wait` on every exit path,
    /// including error paths — `std::process::Child` does not reap on
    /// `Drop`, so skipping this would leak a zombie process exactly as
    /// skipping `waitpid` would in the original implementation.
    pub fn wait(mut self) -> io::Result<ExitStatus> {
        self.child.wait()
    }
}

/// Build the argument vector for a single editor invocation, in the fixed
/// order the original implementation uses: read-only/no-tty/no-X flags,
/// then the geometry and display directives, then (if scrolled) a jump
/// directive, then the forced redraw and quit directives, then `--` and the
/// file path.
fn build_args(path: &Path, term_rows: u32, term_cols: u32, top_row: usize) -> Vec<String> {
    let mut args = vec![
        "-R".to_string(),
        "--not-a-term".to_string(),
        "-X".to_string(),
        "+set nonumber".to_string(),
        "+set laststatus=0".to_string(),
        "+set noruler".to_string(),
        "+set nowrap".to_string(),
        "+set scrolloff=0".to_string(),
        format!("+set lines={term_rows}"),
        format!("+set columns={term_cols}"),
    ];

    if top_row > 1 {
        // Scroll the requested row to the top of the window: jump to it
        // with `G`, then `z<CR>` repositions the window so the cursor line
        // becomes the first visible row.
        args.push(format!("+normal! {top_row}Gz\r"));
    }

    args.push("+redraw".to_string());
    args.push("+qa!".to_string());
    args.push("--".to_string());
    args.push(path.display().to_string());

    debug_assert!(
        args.iter()
            .take_while(|a| a.as_str() != "--")
            .filter(|a| a.starts_with('+'))
            .count()
            <= MAX_DIRECTIVES,
        "too many directives for Vim to handle"
    );

    args
}

/// Spawn the editor against `path`, forcing a `term_cols`-wide,
/// `term_rows`-tall display and scrolling so that `top_row` (1-indexed) is
/// the first visible line.
///
/// `top_row == 1` (or any value `<= 1`) renders from the start of the file
/// with no scroll jump.
///
/// # Errors
///
/// Returns an error if the pipe, null device, or subprocess cannot be
/// created — `io::Error::kind() == ErrorKind::NotFound` most commonly means
/// the editor binary is not on `PATH` (see `pc_core::have_editor`).
pub fn spawn(
    path: &Path,
    term_rows: u32,
    term_cols: u32,
    top_row: usize,
) -> io::Result<EditorProcess> {
    debug_assert!((MIN_COLS..=MAX_COLS).contains(&term_cols));
    debug_assert!((1..=MAX_ROWS).contains(&term_rows));

    let args = build_args(path, term_rows, term_cols, top_row);
    tracing::debug!(?path, term_rows, term_cols, top_row, "spawning editor");

    let mut child = Command::new(EDITOR_BIN)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .expect("stdout was configured as Stdio::piped()");

    tracing::debug!(pid = child.id(), "editor spawned");
    Ok(EditorProcess { child, stdout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prelude_flags_come_first_in_order() {
        let args = build_args(Path::new("file.txt"), 24, 80, 1);
        assert_eq!(args[0], "-R");
        assert_eq!(args[1], "--not-a-term");
        assert_eq!(args[2], "-X");
    }

    #[test]
    fn geometry_directives_use_forced_dimensions() {
        let args = build_args(Path::new("file.txt"), 42, 123, 1);
        assert!(args.contains(&"+set lines=42".to_string()));
        assert!(args.contains(&"+set columns=123".to_string()));
    }

    #[test]
    fn no_jump_directive_when_top_row_is_one() {
        let args = build_args(Path::new("file.txt"), 24, 80, 1);
        assert!(!args.iter().any(|a| a.starts_with("+normal!")));
    }

    #[test]
    fn jump_directive_present_when_scrolled() {
        let args = build_args(Path::new("file.txt"), 24, 80, 500);
        assert!(args.contains(&"+normal! 500Gz\r".to_string()));
    }

    #[test]
    fn trailer_ends_with_separator_then_path() {
        let args = build_args(Path::new("/tmp/some file.txt"), 24, 80, 1);
        let sep = args.iter().position(|a| a == "--").unwrap();
        assert_eq!(args[sep + 1], "/tmp/some file.txt");
        assert_eq!(sep, args.len() - 2);
    }

    #[test]
    fn directive_count_stays_within_vim_limit() {
        let args = build_args(Path::new("file.txt"), 24, 80, 500);
        let directives = args
            .iter()
            .take_while(|a| a.as_str() != "--")
            .filter(|a| a.starts_with('+'))
            .count();
        assert!(directives <= MAX_DIRECTIVES);
    }

    #[test]
    fn spawn_fails_gracefully_when_editor_missing_from_path() {
        if which::which(EDITOR_BIN).is_ok() {
            // Can't exercise the not-found path on a machine that has vim.
            return;
        }
        let err = spawn(Path::new("file.txt"), 24, 80, 1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
