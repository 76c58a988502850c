//! # Envelope codec
//!
//! Encodes and decodes [`types::Envelope`] to/from a compact MessagePack
//! representation (spec §4.1), chosen so heterogeneous `data` payloads
//! survive round-tripping without a schema registry — the same reasoning
//! the original implementation used `msgpack` for.
//!
//! `encode` is total: any well-formed `Envelope` serializes without error.
//! `decode` fails with [`DecodeError`] on truncation or structural
//! mismatch.

mod error;

pub use error::DecodeError;

use types::Envelope;

/// Encode an envelope to its wire representation.
///
/// Total for any well-formed envelope — the only failure mode
/// (`rmp_serde::encode::Error`) occurs for non-serializable types, which
/// `Envelope`'s fields never produce.
pub fn encode(envelope: &Envelope) -> Vec<u8> {
    rmp_serde::to_vec(envelope).expect("Envelope is always serializable")
}

/// Decode an envelope from its wire representation.
pub fn decode(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    rmp_serde::from_slice(bytes).map_err(error::decode_error)
}

/// Encode a strategy's reply list (spec §4.4: "possibly empty" list of
/// follow-up envelopes, sent as the single REP payload).
pub fn encode_reply_list(envelopes: &[Envelope]) -> Vec<u8> {
    rmp_serde::to_vec(envelopes).expect("reply list is always serializable")
}

/// Decode a strategy's reply list.
pub fn decode_reply_list(bytes: &[u8]) -> Result<Vec<Envelope>, DecodeError> {
    rmp_serde::from_slice(bytes).map_err(error::decode_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::payload::{CancelAllOrderData, OrderBookData};
    use types::MsgType;

    #[test]
    fn connect_round_trips() {
        let envelope = Envelope::connect("strategy-1");
        let bytes = encode(&envelope);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(envelope, decoded);
    }

    #[test]
    fn order_book_round_trips_with_msg_time() {
        let payload = OrderBookData {
            timestamp: 1_700_000_000,
            bids: vec![(100.0, 1.0)],
            asks: vec![(101.0, 1.0)],
        };
        let mut envelope = Envelope::data_message(
            MsgType::OrderBook,
            Some("coinbase".into()),
            Some("BTC/USD".into()),
            &payload,
        )
        .unwrap();
        envelope.msg_time = Some(12345);

        let bytes = encode(&envelope);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(envelope, decoded);
        let round_tripped_payload: OrderBookData = decoded.payload().unwrap();
        assert_eq!(round_tripped_payload, payload);
    }

    #[test]
    fn cancel_all_round_trips() {
        let payload = CancelAllOrderData {
            symbol: "ETH/USD".into(),
        };
        let envelope = Envelope::data_message(
            MsgType::CancelAllOrder,
            Some("coinbase".into()),
            Some("ETH/USD".into()),
            &payload,
        )
        .unwrap();
        let decoded = decode(&encode(&envelope)).unwrap();
        assert_eq!(envelope, decoded);
    }

    #[test]
    fn empty_reply_list_round_trips() {
        let bytes = encode_reply_list(&[]);
        let decoded = decode_reply_list(&bytes).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let envelope = Envelope::connect("x");
        let mut bytes = encode(&envelope);
        bytes.truncate(bytes.len() / 2);
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let bytes = [0xc1u8; 8]; // 0xc1 is msgpack's reserved "never used" marker
        assert!(decode(&bytes).is_err());
    }
}
