//! Shared helpers for initdag's integration tests.

pub mod builders;
pub mod recording;

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through the harness's capture, so it only shows up for
/// failing tests (or with `--nocapture`). `RUST_LOG` overrides the default
/// of `initdag=debug,warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("initdag=debug,warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_thread_names(true)
            .try_init();
    });
}
