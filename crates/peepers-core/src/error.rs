use thiserror::Error;

pub use peepers_api::error::{ErrorKind, ServiceError};

#[derive(Debug, Error)]
pub enum PeepersError {
    #[error("config error: {0}")]
    Config(String),

    #[error("preference error: {0}")]
    Preference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed catalog fetch as seen by a controller.
///
/// Service errors are flattened into this at the runtime boundary so the
/// controllers stay independent of which service answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    /// Classify any catalog service error.
    pub fn from_service<E: ServiceError>(err: E) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}
