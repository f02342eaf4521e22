//! Error types for the expression matrix library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A line of the landmark/control input stream could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// No compatible output device could be opened
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Writing a frame to the output device failed; the transport has been dropped
    #[error("Transport write failed: {0}")]
    TransportWrite(String),

    /// Threshold name not recognised by the tuning surface
    #[error("Unknown threshold: {0}")]
    UnknownThreshold(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
