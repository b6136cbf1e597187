//! Flag parsing for the `pagecat` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// When to keep ANSI color escape sequences in the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum Colour {
    /// Always emit color escapes.
    Always,
    /// Emit color escapes unless `NO_COLOR` is set in the environment.
    Auto,
    /// Never emit color escapes.
    Never,
}

/// Render files exactly as Vim would display them, as ANSI-annotated text.
#[derive(Debug, Parser)]
#[command(name = "pagecat", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Files to render.
    pub paths: Vec<PathBuf>,

    /// When to keep color escape sequences in the output.
    #[arg(short = 'c', long = "colour", alias = "color", value_enum, default_value = "auto")]
    pub colour: Colour,

    /// Enable the library's debug sink, writing to standard error.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Show the manual page and exit.
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Show the version and exit.
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn colour_defaults_to_auto() {
        let args = Args::parse_from(["pagecat", "file.txt"]);
        assert_eq!(args.colour, Colour::Auto);
        assert_eq!(args.paths, vec![PathBuf::from("file.txt")]);
    }

    #[test]
    fn colour_flag_accepts_long_and_short_forms() {
        assert_eq!(
            Args::parse_from(["pagecat", "-c", "never", "f"]).colour,
            Colour::Never
        );
        assert_eq!(
            Args::parse_from(["pagecat", "--colour", "always", "f"]).colour,
            Colour::Always
        );
        assert_eq!(
            Args::parse_from(["pagecat", "--color", "always", "f"]).colour,
            Colour::Always
        );
    }

    #[test]
    fn multiple_paths_are_collected_in_order() {
        let args = Args::parse_from(["pagecat", "a.txt", "b.txt"]);
        assert_eq!(args.paths, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn debug_help_and_version_default_to_false() {
        let args = Args::parse_from(["pagecat"]);
        assert!(!args.debug);
        assert!(!args.help);
        assert!(!args.version);
    }
}
