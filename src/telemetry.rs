use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over the passed default;
/// logs go to stderr so stdout stays parseable in the CLI.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
