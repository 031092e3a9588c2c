use tracing_subscriber::EnvFilter;

/// Initializes the tracing/logging infrastructure for the application.
///
/// Output is the compact `fmt` format. `RUST_LOG` selects what is shown and
/// falls back to `info`:
/// - `RUST_LOG=debug` - request payloads and persistence writes
/// - `RUST_LOG=foodcart=debug,resource_actor=info` - per-crate levels
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
