// ==========================================
// GPL Cart - logging initialisation
// ==========================================
// tracing + tracing-subscriber, level from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// # Environment
/// - RUST_LOG: filter directives (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=gplcart::importer=trace
///
/// # Example
/// ```no_run
/// use gplcart::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Machine-readable variant for the binary (`GPLCART_LOG_JSON=1`)
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .init();
}

/// Debug-level subscriber writing through the test harness
///
/// Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
