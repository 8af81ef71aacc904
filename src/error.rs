//! # Error Types
//!
//! Custom error types for Analog Mouse Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Analog Mouse Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Serial port could not be opened
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial devices could be opened
    #[error("No serial device found (tried: {0})")]
    SerialPortNotFound(String),

    /// The sample stream reached end of file
    #[error("Transport closed")]
    TransportClosed,

    /// A sample line did not yield two integer readings
    #[error("Sample parse error: {0}")]
    Parse(String),

    /// Response curve text could not be parsed
    #[error("Curve parse error: {0}")]
    CurveParse(String),

    /// Virtual pointer device errors
    #[error("Pointer error: {0}")]
    Pointer(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Analog Mouse Bridge
pub type Result<T> = std::result::Result<T, BridgeError>;
