use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SequencerSettings {
    pub general: config::GeneralConfig,
    pub transport: config::TransportConfig,
    #[serde(default)]
    pub sequencer: config::SequencerConfig,
    #[serde(default)]
    pub logging: config::LoggingConfig,
}
