use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber for the CLI.
///
/// `RUST_LOG` wins when set; otherwise events at `INFO` and above are shown.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(env_filter)
        .compact()
        .init();
}
