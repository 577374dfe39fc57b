use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. Logs go to stderr; stdout carries the SQL script.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seed_service=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
