//! RxNorm ingredient hierarchy export binary.
//!
//! Configured through `RXNORM_*` environment variables; see
//! [`ExportConfig::from_env`].

use rxnorm_export::{run, ExportConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match ExportConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    match run(&config) {
        Ok(summary) => summary.log(),
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            std::process::exit(1);
        }
    }
}
