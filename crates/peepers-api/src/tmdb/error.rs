use thiserror::Error;

use crate::error::{ErrorKind, ServiceError};

/// Errors from the TMDB API client.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ServiceError for TmdbError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Api { .. } => ErrorKind::Network,
            Self::Parse(_) => ErrorKind::Protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let http = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert_eq!(TmdbError::from(http).kind(), ErrorKind::Network);
        assert_eq!(
            TmdbError::Api {
                status: 401,
                message: "Invalid API key".into()
            }
            .kind(),
            ErrorKind::Network
        );
        assert_eq!(
            TmdbError::Parse("missing field `results`".into()).kind(),
            ErrorKind::Protocol
        );
    }
}
