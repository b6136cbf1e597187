//! A growable byte buffer used as transient scratch space: staging the raw
//! bytes of an in-progress CSI sequence, and later building up one
//! serialized row of output.
//!
//! This replaces the C implementation's `buffer_t`, which wraps an
//! `open_memstream`-style `FILE *` so it can be built with `fprintf` and then
//! "synced" into a NUL-terminated string. `Vec<u8>` plus `std::io::Write`
//! already gives a growable sink with no separate sync step.

#![warn(clippy::pedantic)]

use std::io::{self, Write};

/// A reusable byte buffer, cleared and refilled once per terminal operation.
#[derive(Debug, Default)]
pub struct StageBuffer(Vec<u8>);

impl StageBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Interpret the staged bytes as UTF-8.
    ///
    /// # Panics
    ///
    /// Panics if the buffer does not hold valid UTF-8. Every writer in this
    /// crate family only ever stages ASCII CSI bytes or grapheme bytes that
    /// were themselves validated UTF-8 on the way in, so this is an
    /// invariant rather than a condition callers need to handle.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).expect("staged bytes are always valid UTF-8")
    }
}

impl Write for StageBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
