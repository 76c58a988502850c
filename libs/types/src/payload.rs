//! Typed payload shapes for each [`crate::MsgType`] (spec §6).
//!
//! These are the shapes gateways and strategies construct and discriminate
//! on; the Sequencer never imports this module. Every struct round-trips
//! through [`crate::Envelope::data_message`] / [`crate::Envelope::payload`]
//! via `serde_json::Value`.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Order side, normalized from either `"buy"/"sell"` or `"BUY"/"SELL"` on
/// the way in (spec §6: "implementer must normalize"); always serialized
/// lowercase on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(de::Error::custom(format!("unrecognized order side: {other}"))),
        }
    }
}

/// `CREATE_ORDER.data.type` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

/// `ORDER_UPDATE.data.status` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
    Expired,
    Rejected,
}

/// `ORDER_BOOK.data` (spec §6): price/quantity pairs per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookData {
    pub timestamp: i64,
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
}

/// Nested `params` object carried by CREATE_ORDER, matching the original
/// source's `client_oid`/`clientOrderId` duplication (kept for
/// compatibility with exchange adapters expecting either key) plus
/// `postOnly`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderParams {
    #[serde(rename = "clientOrderId")]
    pub client_order_id: String,
    #[serde(rename = "postOnly")]
    pub post_only: bool,
}

/// `CREATE_ORDER.data` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderData {
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderKind,
    pub side: Side,
    pub amount: f64,
    pub price: f64,
    pub params: CreateOrderParams,
}

/// `CANCEL_ORDER.data.params` / `CREATE_ORDER_REJECT.data.params` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOrderIdParams {
    #[serde(rename = "clientOrderId")]
    pub client_order_id: String,
}

/// `CREATE_ORDER_REJECT.data` (spec §6, §9 open question): the normalized
/// nested `{params: {clientOrderId}}` shape, plus whatever other fields the
/// rejecting exchange included — preserved via `extra` rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRejectData {
    pub params: ClientOrderIdParams,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// `CANCEL_ORDER.data` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOrderData {
    pub id: String,
    pub params: ClientOrderIdParams,
}

/// `CANCEL_ALL_ORDER.data` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelAllOrderData {
    pub symbol: String,
}

/// `ORDER_UPDATE.data` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdateData {
    pub id: String,
    #[serde(rename = "clientOrderId", default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    pub amount: f64,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// `TRADE_EXECUTION.data` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExecutionData {
    pub id: String,
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    pub amount: f64,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_normalizes_case() {
        let buy_lower: Side = serde_json::from_str("\"buy\"").unwrap();
        let buy_upper: Side = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(buy_lower, buy_upper);
        assert_eq!(buy_lower, Side::Buy);
    }

    #[test]
    fn side_rejects_unknown_values() {
        let err = serde_json::from_str::<Side>("\"hold\"");
        assert!(err.is_err());
    }

    #[test]
    fn reject_preserves_extra_fields() {
        let json = serde_json::json!({
            "params": {"clientOrderId": "c1"},
            "reason": "insufficient_margin"
        });
        let reject: CreateOrderRejectData = serde_json::from_value(json).unwrap();
        assert_eq!(reject.params.client_order_id, "c1");
        assert_eq!(
            reject.extra.get("reason").and_then(|v| v.as_str()),
            Some("insufficient_margin")
        );
    }
}
