use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QuoterConfig {
    pub general: config::GeneralConfig,
    pub transport: config::TransportConfig,
    pub strategy: config::StrategyConfig,
    pub quoter: QuoterSettings,
    #[serde(default)]
    pub logging: config::LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct QuoterSettings {
    pub exchange: String,
    pub min_requote_interval_ns: i64,
    pub price_tick: f64,
    pub quantity: f64,
}
