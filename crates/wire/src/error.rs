use thiserror::Error;

/// Errors surfaced by the wire codec.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The peer closed the connection while we were reading.
    #[error("connection closed by peer")]
    Disconnected,

    /// A socket-level error other than a clean close.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The peer sent bytes that don't parse as the expected primitive
    /// (e.g. a negative or implausibly large string length).
    #[error("protocol error: {0}")]
    Protocol(String),
}
