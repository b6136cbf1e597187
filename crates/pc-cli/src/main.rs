//! `pagecat`: the thin command-line front-end over the `pc-core` highlight
//! loop.
//!
//! Everything here is an interface boundary around the library's single
//! operation — flag parsing, the consent gate, output filtering, the
//! embedded manual page, and ambient logging setup. No rendering logic
//! lives in this crate.

#![warn(clippy::pedantic)]

mod cli;
mod consent;
mod filter;
mod logging;
mod manual;

use std::ops::ControlFlow;
use std::process::ExitCode;

use clap::Parser;

use cli::Args;

fn main() -> ExitCode {
    logging::init();

    let args = Args::parse();

    if args.help {
        return match manual::show() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("pagecat: could not display manual page: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if args.version {
        println!("pagecat {}", pc_core::version());
        return ExitCode::SUCCESS;
    }

    if !consent::granted() {
        eprintln!("{}", consent::warning());
        return ExitCode::FAILURE;
    }

    if args.debug {
        pc_core::debug_on();
    }

    if !pc_core::have_editor() {
        eprintln!("pagecat: vim was not found on PATH");
        return ExitCode::FAILURE;
    }

    let keep_colour = filter::keep_colour(args.colour);

    for path in &args.paths {
        if let Err(code) = render_file(path, keep_colour) {
            return code;
        }
    }

    ExitCode::SUCCESS
}

fn render_file(path: &std::path::Path, keep_colour: bool) -> Result<(), ExitCode> {
    let result = pc_core::highlight(path, |line| {
        print_line(line, keep_colour);
        ControlFlow::Continue(())
    });

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("pagecat: {}: {e}", path.display());
            Err(ExitCode::FAILURE)
        }
    }
}

fn print_line(line: &str, keep_colour: bool) {
    use std::io::Write;

    let rendered = if keep_colour {
        line.to_string()
    } else {
        filter::strip_sgr(line)
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let _ = handle.write_all(rendered.as_bytes());
    if !rendered.ends_with('\n') {
        let _ = handle.write_all(b"\n");
    }
}
