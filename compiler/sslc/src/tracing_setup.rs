//! Subscriber installation for the `sslc` binary.
//!
//! Nothing is installed unless `RUST_LOG` is set. With `SSLC_LOG_TREE` also
//! set, spans are printed as an indented tree instead of flat lines.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(filter);

        let result = if std::env::var_os("SSLC_LOG_TREE").is_some() {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        };
        // Another subscriber already owns the process; keep it.
        let _ = result;
    });
}
