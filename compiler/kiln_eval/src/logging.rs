//! Tracing setup for embedders and tests.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output.
///
/// Call this once at startup. Safe to call multiple times. Does nothing
/// unless `RUST_LOG` is set, e.g. `RUST_LOG=kiln_eval=debug` to see calls,
/// host dispatch and reloads, or `kiln_eval=trace` for every statement.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the embedder.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
