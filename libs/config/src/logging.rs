use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// `[logging]` (spec §2 ambient stack).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Passed to [`tracing_subscriber::EnvFilter`]; overridden by the
    /// `RUST_LOG` environment variable when set.
    pub level: String,
    /// Emit newline-delimited JSON instead of the human-readable format —
    /// set for services running under a log aggregator.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Installs the process-wide tracing subscriber. Call once, near the top
/// of `main`, before any `tracing::info!` et al.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
