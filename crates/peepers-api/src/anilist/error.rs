use thiserror::Error;

use crate::error::{ErrorKind, ServiceError};

/// Errors from the AniList API client.
#[derive(Debug, Error)]
pub enum AniListError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    /// The response decoded but carried a GraphQL `errors` field.
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),
}

impl ServiceError for AniListError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Api { .. } => ErrorKind::Network,
            Self::Parse(_) | Self::GraphQl(_) => ErrorKind::Protocol,
        }
    }
}
