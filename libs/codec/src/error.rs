use thiserror::Error;

/// Failure decoding bytes received off the wire (spec §4.1).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated message: {0}")]
    Truncated(#[source] rmp_serde::decode::Error),

    #[error("structural mismatch decoding envelope: {0}")]
    Malformed(#[source] rmp_serde::decode::Error),
}

impl DecodeError {
    fn from_rmp(err: rmp_serde::decode::Error) -> Self {
        match &err {
            rmp_serde::decode::Error::InvalidMarkerRead(io_err)
            | rmp_serde::decode::Error::InvalidDataRead(io_err)
                if io_err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                DecodeError::Truncated(err)
            }
            _ => DecodeError::Malformed(err),
        }
    }
}

pub(crate) fn decode_error(err: rmp_serde::decode::Error) -> DecodeError {
    DecodeError::from_rmp(err)
}
