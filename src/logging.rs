//! Tracing initialization for host applications embedding the core.

use tracing_subscriber::EnvFilter;

/// Initialize tracing output to stderr.
///
/// Honors `RUST_LOG` when set; defaults to `confab=info` otherwise.
/// Safe to call more than once: later calls are no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("confab=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
