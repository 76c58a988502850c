//! # Sequencer message taxonomy
//!
//! Defines the tagged envelope exchanged on every transport hop
//! ([`Envelope`], [`MsgType`]) and the typed payload shapes gateways and
//! strategies exchange through it ([`payload`]). The Sequencer depends only
//! on [`Envelope`]/[`MsgType`] and never imports [`payload`] — it treats
//! `data` opaquely, per the payload-agnostic design in spec §4.5.

mod envelope;
pub mod payload;

pub use envelope::{Envelope, MsgType};
