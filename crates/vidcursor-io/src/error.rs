//! Error types for vidcursor-io.

use std::io;
use thiserror::Error;

/// Result type for vidcursor-io operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vidcursor-io operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid location or option, detected before any I/O is attempted.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote server answered with a non-success status.
    #[error("HTTP error: {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Canonical reason or response detail
        message: String,
    },

    /// Connection, timeout or body read failure from the HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The location names a scheme that is accepted but has no transport here.
    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),

    /// Bytes are not valid for the requested character set.
    #[error("Cannot decode {charset}: {reason}")]
    Decode {
        /// Character set label
        charset: &'static str,
        /// What went wrong
        reason: String,
    },

    /// The source ended before the requested number of bytes was available.
    #[error("Unexpected end of data: expected {expected} bytes, got {actual}")]
    UnexpectedEof {
        /// Requested byte count
        expected: usize,
        /// Bytes actually delivered
        actual: usize,
    },

    /// I/O error from a local source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reader was closed.
    #[error("Reader is closed")]
    Closed,
}

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad location or option.
    Configuration,
    /// Remote status, connection or timeout failure.
    Transport,
    /// Character set decode failure.
    Decode,
    /// Source exhausted before the request was satisfied.
    Exhaustion,
    /// Local I/O failure.
    Io,
    /// Use after close.
    Closed,
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a decode error for the given charset label.
    pub fn decode(charset: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            charset,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Http { .. } | Self::Network(_) | Self::UnsupportedTransport(_) => {
                ErrorKind::Transport
            }
            Self::Decode { .. } => ErrorKind::Decode,
            Self::UnexpectedEof { .. } => ErrorKind::Exhaustion,
            Self::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => ErrorKind::Exhaustion,
            Self::Io(_) => ErrorKind::Io,
            Self::Closed => ErrorKind::Closed,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::UnexpectedEof { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            Error::Decode { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::Config(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            other => io::Error::other(other),
        }
    }
}
