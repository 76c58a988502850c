//! Shared configuration and CLI plumbing for every sequencer-ecosystem
//! binary (spec §2 ambient stack, §5.3).
//!
//! Each binary deserializes a TOML file into its own top-level config
//! struct composed from the sections here, then passes the relevant
//! section down to the crate that owns it (`network`, `archival`, …).

mod error;
mod logging;

pub use error::ConfigError;
pub use logging::{init_logging, LoggingConfig};

use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `[general]`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub service_name: String,
}

/// `[transport]`: where every Unix domain socket in this deployment lives.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    pub socket_dir: PathBuf,
}

impl TransportConfig {
    /// `{socket_dir}/{prefix}_{connection_id}` (spec §5.2 endpoint naming).
    pub fn endpoint(&self, prefix: &str, connection_id: &str) -> PathBuf {
        self.socket_dir.join(format!("{prefix}_{connection_id}"))
    }

    /// The Sequencer's single fan-in `PullSocket`, where gateways and
    /// strategies both send CONNECT/DISCONNECT/data messages.
    pub fn sequencer_ingress_path(&self) -> PathBuf {
        self.socket_dir.join("sequencer_ingress")
    }

    /// The Sequencer's single fan-out `PubSocket`, carrying every stamped
    /// envelope after it has been published.
    pub fn sequencer_publish_path(&self) -> PathBuf {
        self.socket_dir.join("sequencer_publish")
    }

    /// A strategy's per-connection `RepSocket`, which the Sequencer
    /// connects a `ReqSocket` to once it sees that strategy's CONNECT.
    pub fn strategy_reply_path(&self, connection_id: &str) -> PathBuf {
        self.endpoint("strategy", connection_id)
    }
}

/// `[sequencer]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Per-reply wait before treating a strategy as unresponsive. `0`
    /// disables the timeout (spec §5.5 open question — default off,
    /// matching the original implementation's unbounded wait).
    pub reply_timeout_ms: u64,
    /// Local queue depth above which the sequencer logs a warning; not a
    /// hard cap.
    pub queue_soft_limit: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: 0,
            queue_soft_limit: 10_000,
        }
    }
}

/// `[strategy]`.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    pub connection_id: String,
    pub symbols: Vec<String>,
}

/// Top-level CLI surface every binary shares: `--config <path>`.
#[derive(Debug, Parser)]
pub struct Cli {
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Parses a TOML file at `path` into `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct TestConfig {
        general: GeneralConfig,
        transport: TransportConfig,
    }

    #[test]
    fn loads_nested_sections_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [general]
            service_name = "sequencer"

            [transport]
            socket_dir = "/tmp/sockets"
            "#
        )
        .unwrap();

        let config: TestConfig = load_config(file.path()).unwrap();
        assert_eq!(config.general.service_name, "sequencer");
        assert_eq!(config.transport.socket_dir, PathBuf::from("/tmp/sockets"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result: Result<TestConfig, _> = load_config(Path::new("/nonexistent/path.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn endpoint_path_matches_naming_convention() {
        let transport = TransportConfig {
            socket_dir: PathBuf::from("/tmp/sockets"),
        };
        assert_eq!(
            transport.endpoint("strategy", "quoter-1"),
            PathBuf::from("/tmp/sockets/strategy_quoter-1")
        );
    }
}
