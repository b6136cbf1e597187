//! The first-run consent gate: the CLI refuses to shell out to Vim on the
//! user's behalf until they have acknowledged it by creating a sentinel
//! file in their home directory.

use std::path::PathBuf;

const SENTINEL_NAME: &str = ".pagecatrc";

fn sentinel_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(SENTINEL_NAME))
}

/// Has the user created the consent sentinel file?
///
/// Returns `false` (consent withheld) if `HOME` is unset, matching the
/// original's treatment of a missing/inaccessible home directory as "not
/// consented" rather than a hard error.
#[must_use]
pub fn granted() -> bool {
    sentinel_path().is_some_and(|path| path.exists())
}

/// The warning printed to standard error when consent has not been granted.
#[must_use]
pub fn warning() -> String {
    let path = sentinel_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| format!("$HOME/{SENTINEL_NAME}"));
    format!(
        "pagecat: this tool runs Vim as a subprocess on every file you pass it.\n\
         Create {path} to acknowledge this and continue."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn warning_mentions_the_sentinel_filename() {
        assert!(warning().contains(SENTINEL_NAME));
    }
}
