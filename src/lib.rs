pub mod config;
pub mod models;
pub mod pipeline;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so `--json` output on
/// stdout stays parseable. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
