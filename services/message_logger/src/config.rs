use serde::Deserialize;
use std::path::PathBuf;

/// `[archive]`: where the daily gzip-rotated log this binary writes lives.
#[derive(Debug, Deserialize)]
pub struct ArchiveConfig {
    pub directory: PathBuf,
    pub prefix: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./archive"),
            prefix: "torq".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageLoggerSettings {
    pub general: config::GeneralConfig,
    pub transport: config::TransportConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub logging: config::LoggingConfig,
}
