//! Error types for counted-cache.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::string::FromUtf8Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the cache, its backends and its converters.
#[derive(Debug)]
pub enum Error {
    /// The backing store could not be reached or the connection was refused.
    ConnectionError(String),

    /// A backend command (GET, SET, INCR, FLUSH) failed.
    BackendError(String),

    /// Invalid backend configuration.
    ConfigError(String),

    /// Stored bytes are not valid UTF-8 text.
    InvalidUtf8(FromUtf8Error),

    /// Stored bytes are not an integer literal.
    InvalidInteger(ParseIntError),

    /// Stored bytes are not a floating-point literal.
    InvalidFloat(ParseFloatError),

    /// A value could not be encoded for storage.
    SerializationError(String),

    /// Stored bytes could not be decoded into the requested type.
    DeserializationError(String),

    /// Raised by caller-supplied converters.
    ConversionError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidUtf8(e) => write!(f, "Stored value is not valid UTF-8: {}", e),
            Error::InvalidInteger(e) => write!(f, "Stored value is not an integer: {}", e),
            Error::InvalidFloat(e) => write!(f, "Stored value is not a float: {}", e),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ConversionError(msg) => write!(f, "Conversion error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidUtf8(e) => Some(e),
            Error::InvalidInteger(e) => Some(e),
            Error::InvalidFloat(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Self {
        Error::InvalidUtf8(e)
    }
}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Self {
        Error::InvalidInteger(e)
    }
}

impl From<ParseFloatError> for Error {
    fn from(e: ParseFloatError) -> Self {
        Error::InvalidFloat(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::SerializationError(e.to_string())
        } else {
            Error::DeserializationError(e.to_string())
        }
    }
}
