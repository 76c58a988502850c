//! The request/reply endpoint every strategy binary runs (spec §5.6),
//! grounded in the original implementation's `Strategy(BaseApp)`: bind a
//! reply socket, announce CONNECT, answer one request with zero or more
//! follow-up envelopes until the Sequencer goes away, announce DISCONNECT.

use crate::metrics::{MetricsCollector, StrategyMetrics};
use codec::DecodeError;
use network::{PushSocket, RepSocket, TransportError};
use std::path::Path;
use thiserror::Error;
use types::payload::{
    CancelAllOrderData, CancelOrderData, ClientOrderIdParams, CreateOrderData, CreateOrderParams,
    OrderKind, Side,
};
use types::{Envelope, MsgType};

#[derive(Debug, Error)]
pub enum StrategyEndpointError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Implemented by a strategy's business logic. Called once per inbound
/// request; every envelope pushed onto `emit` is returned to the Sequencer
/// as that request's reply list (spec §5.5: "possibly empty").
///
/// A panic inside `handle_request` is caught by the endpoint and turned
/// into an empty reply list plus an `errors` metric increment, so one
/// strategy bug can never stall the Sequencer's round trip. `request.msg_time`
/// is the current virtual time — the only clock a handler should ever
/// consult for business timing decisions.
pub trait StrategyHandler: Send {
    fn handle_request(&mut self, request: &Envelope, emit: &mut ReplyBuilder);
}

/// Accumulates the follow-up envelopes a [`StrategyHandler`] emits while
/// answering one request (`core/strategy.py`'s `send_order`/
/// `cancel_order`/`cancel_all_orders`, generalized to the request/reply
/// shape).
pub struct ReplyBuilder {
    connection_id: String,
    envelopes: Vec<Envelope>,
}

impl ReplyBuilder {
    /// Exposed beyond the endpoint's own `run` loop so handler unit tests
    /// can exercise the real emit methods rather than a stand-in.
    pub fn new(connection_id: &str) -> Self {
        Self {
            connection_id: connection_id.to_string(),
            envelopes: Vec::new(),
        }
    }

    fn push<T: serde::Serialize>(
        &mut self,
        msg_type: MsgType,
        exchange: Option<String>,
        symbol: Option<String>,
        payload: &T,
    ) {
        match Envelope::data_message(msg_type, exchange, symbol, payload) {
            Ok(mut envelope) => {
                envelope.connection_id = Some(self.connection_id.clone());
                self.envelopes.push(envelope);
            }
            Err(error) => {
                tracing::error!(%error, "failed to serialize strategy reply payload, dropping it");
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn emit_create_order(
        &mut self,
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        price: f64,
        quantity: f64,
        client_order_id: impl Into<String>,
        order_type: OrderKind,
        post_only: bool,
    ) {
        let symbol = symbol.into();
        let order = CreateOrderData {
            symbol: symbol.clone(),
            order_type,
            side,
            amount: quantity,
            price,
            params: CreateOrderParams {
                client_order_id: client_order_id.into(),
                post_only,
            },
        };
        self.push(MsgType::CreateOrder, Some(exchange.into()), Some(symbol), &order);
    }

    pub fn emit_cancel_order(
        &mut self,
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        order_id: impl Into<String>,
        client_order_id: impl Into<String>,
    ) {
        let cancel = CancelOrderData {
            id: order_id.into(),
            params: ClientOrderIdParams {
                client_order_id: client_order_id.into(),
            },
        };
        self.push(MsgType::CancelOrder, Some(exchange.into()), Some(symbol.into()), &cancel);
    }

    pub fn emit_cancel_all(&mut self, exchange: impl Into<String>, symbol: impl Into<String>) {
        let symbol = symbol.into();
        let cancel = CancelAllOrderData {
            symbol: symbol.clone(),
        };
        self.push(MsgType::CancelAllOrder, Some(exchange.into()), Some(symbol), &cancel);
    }

    pub fn into_envelopes(self) -> Vec<Envelope> {
        self.envelopes
    }
}

/// Binds a strategy's reply socket and owns the connection to the
/// Sequencer's ingress for CONNECT/DISCONNECT announcements.
pub struct StrategyEndpoint<H: StrategyHandler> {
    connection_id: String,
    rep: RepSocket,
    ingress: PushSocket,
    handler: H,
    metrics: MetricsCollector,
    /// The most recent `msg_time` seen on an inbound request — the
    /// virtual clock driving this strategy's timing decisions (spec §3).
    virtual_time: i64,
}

impl<H: StrategyHandler> StrategyEndpoint<H> {
    /// Binds `rep_path` for the Sequencer to connect its per-strategy
    /// `ReqSocket` to, connects to the Sequencer's ingress `PullSocket` at
    /// `sequencer_ingress_path`, and sends the CONNECT announcement.
    pub async fn bind(
        connection_id: impl Into<String>,
        rep_path: impl AsRef<Path>,
        sequencer_ingress_path: impl AsRef<Path>,
        handler: H,
    ) -> Result<Self, StrategyEndpointError> {
        let connection_id = connection_id.into();
        let rep = RepSocket::bind(rep_path).await?;
        let mut ingress = PushSocket::connect(sequencer_ingress_path).await?;
        ingress
            .send(&codec::encode(&Envelope::connect(&connection_id)))
            .await?;

        Ok(Self {
            connection_id,
            rep,
            ingress,
            handler,
            metrics: MetricsCollector::new(),
            virtual_time: 0,
        })
    }

    pub fn metrics(&self) -> StrategyMetrics {
        self.metrics.get_metrics()
    }

    pub fn virtual_time(&self) -> i64 {
        self.virtual_time
    }

    /// Answers requests until the Sequencer closes the connection, then
    /// sends DISCONNECT and returns.
    pub async fn run(mut self) -> Result<(), StrategyEndpointError> {
        loop {
            let request_bytes = match self.rep.recv_request().await {
                Ok(bytes) => bytes,
                Err(TransportError::PeerClosed) => break,
                Err(error) => return Err(error.into()),
            };

            let request = match codec::decode(&request_bytes) {
                Ok(envelope) => envelope,
                Err(error) => {
                    tracing::error!(%error, "received malformed request, replying empty");
                    self.metrics.increment_errors();
                    self.rep.send_reply(&codec::encode_reply_list(&[])).await?;
                    continue;
                }
            };

            if let Some(t) = request.msg_time {
                self.virtual_time = t;
            }

            self.metrics.increment_messages();
            let mut builder = ReplyBuilder::new(&self.connection_id);
            let handler = &mut self.handler;
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.handle_request(&request, &mut builder);
            }));

            let replies = match outcome {
                Ok(()) => builder.into_envelopes(),
                Err(_) => {
                    tracing::error!(
                        connection_id = %self.connection_id,
                        "strategy handler panicked, replying with an empty list"
                    );
                    self.metrics.increment_errors();
                    Vec::new()
                }
            };

            if !replies.is_empty() {
                self.metrics.increment_signals();
            }
            self.rep
                .send_reply(&codec::encode_reply_list(&replies))
                .await?;
        }

        let _ = self
            .ingress
            .send(&codec::encode(&Envelope::disconnect(&self.connection_id)))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network::{PullSocket, ReqSocket};

    struct EchoHandler;

    impl StrategyHandler for EchoHandler {
        fn handle_request(&mut self, request: &Envelope, emit: &mut ReplyBuilder) {
            if request.msg_type == MsgType::OrderBook {
                let symbol = request.symbol.clone().unwrap_or_default();
                let exchange = request.exchange.clone().unwrap_or_default();
                emit.emit_cancel_all(exchange, symbol);
            }
        }
    }

    #[tokio::test]
    async fn endpoint_replies_and_announces_connect_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let rep_path = dir.path().join("strategy.sock");
        let ingress_path = dir.path().join("sequencer.sock");

        let mut ingress = PullSocket::bind(&ingress_path).await.unwrap();

        let endpoint_rep_path = rep_path.clone();
        let endpoint_ingress_path = ingress_path.clone();
        let endpoint_task = tokio::spawn(async move {
            let endpoint = StrategyEndpoint::bind(
                "quoter-1",
                &endpoint_rep_path,
                &endpoint_ingress_path,
                EchoHandler,
            )
            .await
            .unwrap();
            endpoint.run().await.unwrap();
        });

        let connect = codec::decode(&ingress.recv().await.unwrap()).unwrap();
        assert_eq!(connect.msg_type, MsgType::Connect);
        assert_eq!(connect.connection_id.as_deref(), Some("quoter-1"));

        let mut req = ReqSocket::connect(&rep_path).await.unwrap();
        let mut request = Envelope::data_message(
            MsgType::OrderBook,
            Some("coinbase".into()),
            Some("BTC/USD".into()),
            &serde_json::json!({"timestamp": 1, "bids": [], "asks": []}),
        )
        .unwrap();
        request.msg_time = Some(42);
        let reply_bytes = req.request(&codec::encode(&request)).await.unwrap();
        let replies = codec::decode_reply_list(&reply_bytes).unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].msg_type, MsgType::CancelAllOrder);
        assert_eq!(replies[0].exchange.as_deref(), Some("coinbase"));

        drop(req);
        let disconnect = codec::decode(&ingress.recv().await.unwrap()).unwrap();
        assert_eq!(disconnect.msg_type, MsgType::Disconnect);

        endpoint_task.await.unwrap();
    }

    #[tokio::test]
    async fn panicking_handler_yields_an_empty_reply_instead_of_crashing() {
        use crate::testing::PanickingHandler;

        let dir = tempfile::tempdir().unwrap();
        let rep_path = dir.path().join("strategy.sock");
        let ingress_path = dir.path().join("sequencer.sock");

        let mut ingress = PullSocket::bind(&ingress_path).await.unwrap();

        let endpoint_rep_path = rep_path.clone();
        let endpoint_ingress_path = ingress_path.clone();
        let endpoint_task = tokio::spawn(async move {
            let endpoint = StrategyEndpoint::bind(
                "panicker-1",
                &endpoint_rep_path,
                &endpoint_ingress_path,
                PanickingHandler,
            )
            .await
            .unwrap();
            endpoint.run().await.unwrap();
        });

        let _connect = ingress.recv().await.unwrap();

        let mut req = ReqSocket::connect(&rep_path).await.unwrap();
        let request = Envelope::connect("ignored");
        let reply_bytes = req.request(&codec::encode(&request)).await.unwrap();
        let replies = codec::decode_reply_list(&reply_bytes).unwrap();
        assert!(replies.is_empty());

        drop(req);
        let _disconnect = ingress.recv().await.unwrap();
        endpoint_task.await.unwrap();
    }
}
