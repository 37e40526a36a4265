use tracing_subscriber::EnvFilter;

/// Initialise logging for embedders and tests. With `debug` set the default
/// level is `debug` and `RUST_LOG` may raise or lower it; otherwise the
/// level is pinned to `info` so a stray environment variable cannot flood
/// the output of a host application.
pub fn init(debug: bool) {
    let filter = match (debug, EnvFilter::try_from_default_env()) {
        (true, Ok(filter)) => filter,
        (true, Err(_)) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("info"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
