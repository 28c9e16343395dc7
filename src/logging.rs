use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "pmg_cart_lib=info";

/// Installs the global fmt subscriber. Honors `RUST_LOG`; later calls are no-ops.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
