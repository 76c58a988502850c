//! Top-of-book-following quoter (spec §5.6.1, grounded in
//! `strategy/opti_trade.py`'s quoting logic): on every `ORDER_BOOK` update
//! for its configured symbol, requotes at best-bid-plus-one-tick, throttled
//! by virtual time rather than wall-clock.

use torq_strategy_shared::{ReplyBuilder, StrategyHandler};
use types::payload::{OrderBookData, OrderKind, Side};
use types::{Envelope, MsgType};

pub struct QuoterHandler {
    exchange: String,
    symbol: String,
    min_requote_interval_ns: i64,
    price_tick: f64,
    quantity: f64,
    last_quote_time: Option<i64>,
    next_order_id: u64,
}

impl QuoterHandler {
    pub fn new(
        exchange: String,
        symbol: String,
        min_requote_interval_ns: i64,
        price_tick: f64,
        quantity: f64,
    ) -> Self {
        Self {
            exchange,
            symbol,
            min_requote_interval_ns,
            price_tick,
            quantity,
            last_quote_time: None,
            next_order_id: 0,
        }
    }

    fn due_to_requote(&self, now: i64) -> bool {
        match self.last_quote_time {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.min_requote_interval_ns,
        }
    }

    fn next_client_order_id(&mut self) -> String {
        self.next_order_id += 1;
        format!("quoter-{}-{}", self.symbol, self.next_order_id)
    }
}

impl StrategyHandler for QuoterHandler {
    fn handle_request(&mut self, request: &Envelope, emit: &mut ReplyBuilder) {
        if request.msg_type != MsgType::OrderBook {
            return;
        }
        if request.symbol.as_deref() != Some(self.symbol.as_str()) {
            return;
        }
        let Some(now) = request.msg_time else {
            return;
        };
        if !self.due_to_requote(now) {
            return;
        }
        let Some(book) = request.payload::<OrderBookData>() else {
            return;
        };
        let Some((best_bid, _)) = book.bids.first().copied() else {
            return;
        };

        let price = best_bid + self.price_tick;
        let client_order_id = self.next_client_order_id();
        emit.emit_create_order(
            self.exchange.clone(),
            self.symbol.clone(),
            Side::Buy,
            price,
            self.quantity,
            client_order_id,
            OrderKind::Limit,
            true,
        );
        self.last_quote_time = Some(now);
    }
}
