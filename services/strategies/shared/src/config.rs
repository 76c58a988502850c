//! Strategy configuration helpers.

use serde::{Deserialize, Serialize};

/// Fields every strategy config embeds alongside its own `[strategy]`
/// section loaded from the shared TOML file (see [`config::load_config`]
/// in the `config` crate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStrategyConfig {
    pub name: String,
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl Default for BaseStrategyConfig {
    fn default() -> Self {
        Self {
            name: "unnamed_strategy".to_string(),
            enabled: true,
            log_level: Some("info".to_string()),
        }
    }
}
