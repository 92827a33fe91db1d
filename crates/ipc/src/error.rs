//! Errors raised while reading or writing protocol lines.

/// A line could not be turned into a message, or a message into a line.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Malformed message JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed input that is still not a message (e.g. a blank line)
    #[error("Invalid message: {0}")]
    InvalidFormat(String),
}
