use crate::MAX_MESSAGE_LEN;
use thiserror::Error;

pub type Result<T, E = TransportError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },
    #[error("connection closed")]
    Closed,
    #[error("I/O error: {0}")]
    Io(String),
    #[error("timeout waiting for response")]
    Timeout,
    #[error("message of {0} bytes exceeds the {max} byte limit", max = MAX_MESSAGE_LEN)]
    MessageTooLarge(usize),
}

impl TransportError {
    /// Whether the connection is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TransportError::MessageTooLarge(_))
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => TransportError::Timeout,
            ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::UnexpectedEof => TransportError::Closed,
            _ => TransportError::Io(e.to_string()),
        }
    }
}

/// A token that is not part of the canonical vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not a canonical command: {0:?}")]
pub struct UnknownCommand(pub String);
