//! Shared test setup helpers

use std::env;
use std::sync::Once;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Install the global tracing subscriber once per test binary.
///
/// Honors RUST_LOG when set; defaults to debug so failing tests come with
/// their trace.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_names(false)
                .with_filter(env_filter),
        );

        // Another harness may have claimed the global dispatcher already.
        if subscriber.try_init().is_ok() {
            info!("test setup complete");
        }
    });
}
