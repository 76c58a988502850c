//! The Sequencer's main loop (spec §5.5), ported from `core/sequencer.py`:
//! one `PullSocket` ingress, a fixed-order request/reply fan-out to every
//! connected strategy, and one `PubSocket` publish per drained message.

use crate::connection::ConnectionTable;
use crate::shutdown::Shutdown;
use codec::{decode, decode_reply_list, encode};
use config::TransportConfig;
use network::{PubSocket, PullSocket, ReqSocket, TransportError};
use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use types::{Envelope, MsgType};

pub struct SequencerOptions {
    /// `0` disables the timeout and a `request()` waits indefinitely,
    /// matching the original implementation.
    pub reply_timeout_ms: u64,
    /// Queue depth above which a warning is logged; not a hard cap.
    pub queue_soft_limit: usize,
}

pub struct Sequencer {
    ingress: PullSocket,
    publish: PubSocket,
    transport: TransportConfig,
    table: ConnectionTable,
    options: SequencerOptions,
}

impl Sequencer {
    pub async fn bind(
        transport: TransportConfig,
        options: SequencerOptions,
    ) -> Result<Self, TransportError> {
        let ingress = PullSocket::bind(transport.sequencer_ingress_path()).await?;
        let publish = PubSocket::bind(transport.sequencer_publish_path()).await?;
        Ok(Self {
            ingress,
            publish,
            transport,
            table: ConnectionTable::new(),
            options,
        })
    }

    /// Runs until `shutdown` is triggered or the ingress socket is closed.
    pub async fn run(mut self, shutdown: Shutdown) {
        loop {
            let raw = tokio::select! {
                _ = shutdown.wait() => {
                    tracing::info!("shutdown requested, stopping sequencer");
                    break;
                }
                message = self.ingress.recv() => match message {
                    Some(bytes) => bytes,
                    None => {
                        tracing::warn!("ingress socket closed, stopping sequencer");
                        break;
                    }
                },
            };

            let envelope = match decode(&raw) {
                Ok(envelope) => envelope,
                Err(error) => {
                    tracing::error!(%error, "dropping undecodable ingress message");
                    continue;
                }
            };

            match envelope.msg_type {
                MsgType::Connect => self.handle_connect(envelope).await,
                MsgType::Disconnect => self.handle_disconnect(&envelope),
                _ => self.drain_tick(envelope).await,
            }
        }
    }

    async fn handle_connect(&mut self, envelope: Envelope) {
        let Some(connection_id) = envelope.connection_id else {
            tracing::error!("CONNECT envelope is missing connection_id, ignoring");
            return;
        };
        let path = self.transport.strategy_reply_path(&connection_id);
        match ReqSocket::connect(&path).await {
            Ok(socket) => {
                tracing::info!(%connection_id, "strategy connected");
                self.table.insert(connection_id, socket);
            }
            Err(error) => {
                tracing::error!(%connection_id, %error, "failed to reach strategy's reply socket");
            }
        }
    }

    fn handle_disconnect(&mut self, envelope: &Envelope) {
        let Some(connection_id) = &envelope.connection_id else {
            tracing::error!("DISCONNECT envelope is missing connection_id, ignoring");
            return;
        };
        if self.table.remove(connection_id).is_some() {
            tracing::info!(%connection_id, "strategy disconnected");
        }
    }

    /// Drains the local queue seeded by one ingress message, stamping
    /// every message drained in this tick with the same virtual time
    /// (spec §3, §8 property 1).
    async fn drain_tick(&mut self, first: Envelope) {
        let t = now_ns();
        let mut queue: VecDeque<Envelope> = VecDeque::new();
        queue.push_back(first);

        while let Some(mut message) = queue.pop_front() {
            message.msg_time = Some(t);
            let encoded = encode(&message);

            for (connection_id, result) in self.fan_out(&encoded).await {
                match result {
                    Ok(reply_bytes) => match decode_reply_list(&reply_bytes) {
                        Ok(replies) => queue.extend(replies),
                        Err(error) => {
                            tracing::error!(%connection_id, %error, "dropping malformed reply list");
                        }
                    },
                    Err(error) => {
                        tracing::error!(%connection_id, %error, "strategy unresponsive, disconnecting");
                        self.table.remove(&connection_id);
                    }
                }
            }

            if let Err(error) = self.publish.publish(encoded) {
                tracing::error!(%error, "failed to publish envelope");
            }

            if queue.len() > self.options.queue_soft_limit {
                tracing::warn!(depth = queue.len(), "local queue exceeds the soft limit");
            }
        }
    }

    /// Requests every connected strategy concurrently but returns results
    /// in fixed connection-table order, not completion order (spec §8
    /// property 4).
    async fn fan_out(&mut self, encoded: &[u8]) -> Vec<(String, Result<Vec<u8>, TransportError>)> {
        let timeout_ms = self.options.reply_timeout_ms;
        let futures = self.table.iter_mut().map(|(connection_id, socket)| {
            let connection_id = connection_id.clone();
            let request_bytes = encoded.to_vec();
            async move {
                let result = if timeout_ms > 0 {
                    match tokio::time::timeout(
                        Duration::from_millis(timeout_ms),
                        socket.request(&request_bytes),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(TransportError::Timeout),
                    }
                } else {
                    socket.request(&request_bytes).await
                };
                (connection_id, result)
            }
        });
        futures::future::join_all(futures).await
    }
}

fn now_ns() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}
