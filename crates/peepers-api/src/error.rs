use std::fmt;

/// Coarse classification shared by every catalog error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure or a non-2xx response.
    Network,
    /// The response arrived but its payload was not what we expected.
    Protocol,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

/// Implemented by each service's error enum so callers can classify failures
/// without knowing which service produced them.
pub trait ServiceError: std::error::Error + Send + Sync + 'static {
    fn kind(&self) -> ErrorKind;
}
