use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchivalError {
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize archived envelope: {0}")]
    Json(#[from] serde_json::Error),
}
