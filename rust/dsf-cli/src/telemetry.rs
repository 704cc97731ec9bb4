use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route `tracing` events to stderr, filtered by `RUST_LOG` (default `warn`).
///
/// Stdout carries encoded rows, so diagnostics must never go there.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
