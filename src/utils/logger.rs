/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/
use std::env;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs the global `tracing` subscriber once per process.
///
/// The level comes from the `LOGLEVEL` environment variable (`DEBUG`, `info`,
/// `bytebodh_client=trace`, ...) and defaults to `info`.
pub fn setup_logger() {
    INIT.call_once(|| {
        let level = env::var("LOGLEVEL").unwrap_or_else(|_| "info".to_string());
        let filter = EnvFilter::try_new(level.to_lowercase())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
