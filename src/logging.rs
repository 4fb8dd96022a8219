use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Installs the stderr fmt subscriber once per process. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_tracing() {
    INITIALISED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
