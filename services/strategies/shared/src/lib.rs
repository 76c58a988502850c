//! Request/reply endpoint framework for strategy binaries (spec §5.6).
//!
//! A strategy binds a [`endpoint::StrategyEndpoint`], announces itself to
//! the Sequencer with a CONNECT envelope, then answers exactly one
//! [`endpoint::StrategyHandler::handle_request`] call per inbound message
//! for the remainder of its life. Everything else in this crate —
//! [`metrics`], [`testing`] — supports writing and exercising a handler.

pub mod config;
pub mod endpoint;
pub mod metrics;
pub mod testing;

pub use config::BaseStrategyConfig;
pub use endpoint::{ReplyBuilder, StrategyEndpoint, StrategyEndpointError, StrategyHandler};
pub use metrics::{MetricsCollector, StrategyMetrics};
