pub mod config;
pub mod connection;
pub mod engine;
pub mod shutdown;

pub use config::SequencerSettings;
pub use engine::{Sequencer, SequencerOptions};
pub use shutdown::{listen_for_signals, Shutdown};
