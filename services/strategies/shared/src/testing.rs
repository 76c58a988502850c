//! Testing utilities for strategy handlers.

use crate::endpoint::{ReplyBuilder, StrategyHandler};
use types::Envelope;

/// A [`StrategyHandler`] that records every request it sees and never
/// emits a reply, useful for asserting an endpoint's request-handling
/// loop without exercising real trading logic.
pub struct RecordingHandler {
    pub requests: Vec<Envelope>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self { requests: Vec::new() }
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyHandler for RecordingHandler {
    fn handle_request(&mut self, request: &Envelope, _emit: &mut ReplyBuilder) {
        self.requests.push(request.clone());
    }
}

/// A handler whose `handle_request` always panics, for exercising the
/// endpoint's panic-to-empty-reply guarantee.
pub struct PanickingHandler;

impl StrategyHandler for PanickingHandler {
    fn handle_request(&mut self, _request: &Envelope, _emit: &mut ReplyBuilder) {
        panic!("handler always panics");
    }
}
