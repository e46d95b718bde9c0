//! Error types for the AGI client

use thiserror::Error;

/// Errors raised by the AGI client.
///
/// Every variant except [`InvalidArgument`](AgiError::InvalidArgument) means
/// the command stream can no longer be trusted; see [`AgiError::is_fatal`].
/// An empty required argument is not an error: commands answer it with a
/// locally synthesized reply instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AgiError {
    /// Reading from or writing to the transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The startup block was truncated or contained a malformed line.
    #[error("malformed startup block: {message}")]
    StartupFormat { message: String },

    /// A reply line did not match `<code> result=<token>[ <data>]`.
    #[error("protocol desync: {message} (line: {line:?})")]
    ProtocolDesync { line: String, message: String },

    /// The engine closed the stream while a reply was pending.
    #[error("connection closed by engine")]
    ConnectionClosed,

    /// An argument would have split the command across lines.
    #[error("invalid argument: {context} must not contain newlines")]
    InvalidArgument { context: String },
}

impl AgiError {
    /// Build a [`StartupFormat`](AgiError::StartupFormat) error.
    pub fn startup_format(message: impl Into<String>) -> Self {
        Self::StartupFormat {
            message: message.into(),
        }
    }

    /// Build a [`ProtocolDesync`](AgiError::ProtocolDesync) error for `line`.
    pub fn protocol_desync(line: &str, message: impl Into<String>) -> Self {
        Self::ProtocolDesync {
            line: line.to_string(),
            message: message.into(),
        }
    }

    /// `true` when the session cannot continue and the script should exit.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result alias used throughout the crate.
pub type AgiResult<T> = Result<T, AgiError>;
