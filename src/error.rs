//! Error types for Heliocoin

use std::fmt;

#[derive(Debug, Clone)]
pub enum ChainError {
    /// A wire stream ended before the requested number of bytes could be read.
    TruncatedStream { needed: usize, remaining: usize },
    /// A compact-size prefix was not encoded in its minimal form.
    NonCanonicalCompactSize,
    /// A length prefix claimed more elements than the wire format permits.
    OversizedField { claimed: u64, max: u64 },
    /// A complete value was decoded but bytes were left over in the stream.
    TrailingBytes(usize),
    Deserialize(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::TruncatedStream { needed, remaining } => write!(
                f,
                "Truncated stream: needed {} bytes, {} remaining",
                needed, remaining
            ),
            ChainError::NonCanonicalCompactSize => {
                write!(f, "Compact size is not minimally encoded")
            }
            ChainError::OversizedField { claimed, max } => {
                write!(f, "Length prefix claims {} elements (max: {})", claimed, max)
            }
            ChainError::TrailingBytes(n) => {
                write!(f, "{} trailing bytes after decoded value", n)
            }
            ChainError::Deserialize(msg) => write!(f, "Deserialization error: {}", msg),
            ChainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
