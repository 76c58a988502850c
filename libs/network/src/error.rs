use thiserror::Error;

/// Failure modes for the Unix-domain-socket transports (spec §4.2).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed its end of the connection. For a `ReqSocket` this
    /// means the reply never arrived; for a bound `PullSocket`/`RepSocket`
    /// it means the producing process disconnected mid-message.
    #[error("peer closed the connection")]
    PeerClosed,

    #[error("message of {0} bytes exceeds the maximum frame size")]
    FrameTooLarge(usize),

    #[error("socket already bound at {0}")]
    AlreadyBound(String),

    /// Raised by callers that race a request against a deadline (the
    /// Sequencer's optional `reply_timeout_ms`) — not produced by this
    /// crate's sockets themselves, which otherwise wait indefinitely.
    #[error("request timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, TransportError>;
