//! Tracing initialization.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// RUST_LOG overrides the default filter, e.g.
/// RUST_LOG=debug,skyjo_server=trace,tower_http=info
pub fn init() {
    let fmt_layer = fmt::layer().with_target(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum=info"));

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
