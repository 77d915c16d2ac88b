//! Standard tracing subscriber setup for binaries.

/// Initialize a tracing subscriber with env-based filtering.
///
/// Default directives:
/// - `request_metadata=info`
/// - `request_metadata_core=info`
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("request_metadata=info".parse().unwrap_or_default())
        .add_directive("request_metadata_core=info".parse().unwrap_or_default());

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
