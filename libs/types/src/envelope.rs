//! The message envelope exchanged on every internal transport hop.
//!
//! `Envelope` is deliberately a flat record rather than a sum type: the
//! Sequencer needs to read `msg_type` and stamp `msg_time` without knowing
//! anything about `data`'s shape. Gateways and strategies are the only
//! participants that discriminate on `data`, via the typed payload structs
//! in [`crate::payload`].

use serde::{Deserialize, Serialize};

/// The closed set of message kinds every participant understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgType {
    Connect,
    Disconnect,
    OrderBook,
    CreateOrder,
    CreateOrderReject,
    CancelOrder,
    CancelOrderReject,
    CancelAllOrder,
    OrderUpdate,
    TradeExecution,
}

impl MsgType {
    /// CONNECT/DISCONNECT never carry `msg_time` or `data` and never pass
    /// through the Sequencer's local queue.
    pub fn is_control(self) -> bool {
        matches!(self, MsgType::Connect | MsgType::Disconnect)
    }
}

/// The tagged record exchanged on every internal hop.
///
/// `msg_time` is `None` on ingress and stamped exactly once by the
/// Sequencer when the envelope is first dequeued (spec §3). `data` is kept
/// as an opaque [`serde_json::Value`] rather than a typed enum so the
/// Sequencer never needs to know the payload shape for a given `msg_type` —
/// gateways and strategies convert to/from the typed structs in
/// [`crate::payload`] at the edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub msg_type: MsgType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    /// Build a CONNECT envelope for the given `connection_id`.
    pub fn connect(connection_id: impl Into<String>) -> Self {
        Self {
            msg_type: MsgType::Connect,
            msg_time: None,
            exchange: None,
            symbol: None,
            connection_id: Some(connection_id.into()),
            data: None,
        }
    }

    /// Build a DISCONNECT envelope for the given `connection_id`.
    pub fn disconnect(connection_id: impl Into<String>) -> Self {
        Self {
            msg_type: MsgType::Disconnect,
            msg_time: None,
            exchange: None,
            symbol: None,
            connection_id: Some(connection_id.into()),
            data: None,
        }
    }

    /// Build a data-carrying envelope from a typed payload. `msg_time` is
    /// left unset — only the Sequencer sets it.
    pub fn data_message<T: Serialize>(
        msg_type: MsgType,
        exchange: Option<String>,
        symbol: Option<String>,
        payload: &T,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            msg_type,
            msg_time: None,
            exchange,
            symbol,
            connection_id: None,
            data: Some(serde_json::to_value(payload)?),
        })
    }

    /// Deserialize `data` into a typed payload. Returns `None` if `data` is
    /// absent or does not match `T`'s shape.
    pub fn payload<T: for<'de> Deserialize<'de>>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
