//! A process-wide debug-message sink, independent of the `tracing` events
//! the driver also emits.
//!
//! This exists because the library's public API (`set_debug` / `debug_on` /
//! `debug_off`) is specified as an explicit, caller-installable sink rather
//! than an ambient logging subscriber — a caller embedding this crate may
//! want debug text funneled into a UI pane, not just `RUST_LOG`-gated
//! tracing output. A single `Mutex`-guarded slot (not per-thread storage)
//! keeps every code path writing to the same destination and keeps
//! interleaving sane if a future caller drives `highlight` from more than
//! one thread.

use std::io::Write;
use std::sync::Mutex;

type Sink = Box<dyn Write + Send>;

static DEBUG_SINK: Mutex<Option<Sink>> = Mutex::new(None);

/// Install `writer` as the debug sink, replacing any previous one.
pub fn set_debug(writer: impl Write + Send + 'static) {
    let mut guard = DEBUG_SINK.lock().expect("debug sink mutex poisoned");
    *guard = Some(Box::new(writer));
}

/// Install standard error as the debug sink.
pub fn debug_on() {
    set_debug(std::io::stderr());
}

/// Clear the debug sink; subsequent debug messages are silently dropped.
pub fn debug_off() {
    let mut guard = DEBUG_SINK.lock().expect("debug sink mutex poisoned");
    *guard = None;
}

/// Write one line to the debug sink, if one is installed. No-op otherwise.
pub fn emit(message: &std::fmt::Arguments<'_>) {
    let mut guard = DEBUG_SINK.lock().expect("debug sink mutex poisoned");
    if let Some(sink) = guard.as_mut() {
        let _ = writeln!(sink, "{message}");
    }
}

/// Write a formatted line to the installed debug sink, mirroring the
/// original implementation's `flockfile`/`funlockfile`-guarded `DEBUG()`
/// macro.
macro_rules! debug_line {
    ($($arg:tt)*) => {
        $crate::debug::emit(&format_args!($($arg)*))
    };
}

pub(crate) use debug_line;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone, Default)]
    struct Collector(Arc<StdMutex<Vec<u8>>>);

    impl Write for Collector {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn messages_go_nowhere_without_a_sink() {
        debug_off();
        debug_line!("dropped on the floor");
    }

    #[test]
    fn installed_sink_receives_formatted_messages() {
        let collector = Collector::default();
        set_debug(collector.clone());
        debug_line!("hello {}", 42);
        debug_off();
        let written = String::from_utf8(collector.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "hello 42\n");
    }
}
