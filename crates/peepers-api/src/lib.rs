//! Catalog clients for the film/TV (TMDB) and anime (AniList) metadata APIs.
//!
//! Every request function issues exactly one HTTP request and returns the
//! parsed payload. Nothing here caches, retries or holds state beyond the
//! HTTP connection pool.

pub mod anilist;
pub mod error;
pub mod image;
pub mod tmdb;
pub mod traits;

pub use error::{ErrorKind, ServiceError};
