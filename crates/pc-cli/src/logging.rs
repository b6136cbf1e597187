//! Ambient `tracing` setup, independent of the library's own `--debug` sink.
//!
//! A user who wants conventional structured logs sets `RUST_LOG`; this is
//! separate from `-d`/`--debug`, which installs `pc_core`'s explicit
//! caller-facing sink.

pub fn init() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
