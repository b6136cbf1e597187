//! Highlighting driver: the crate's one published operation is "render this
//! file the way the editor would display it, and deliver it line by line."
//!
//! This crate owns everything downstream of the virtual terminal (`pc-term`)
//! and editor driver (`pc-driver`): the tiling loop that covers files taller
//! than the editor's internal row limit, the public error type, the debug
//! sink, and the version registry.

#![warn(clippy::pedantic)]

mod debug;
mod error;
mod highlight;
mod version;

pub use error::HighlightError;
pub use highlight::{have_editor, highlight, highlight_line};
pub use version::{version, version_le};

pub use debug::{debug_off, debug_on, set_debug};
