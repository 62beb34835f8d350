pub mod client;
pub mod error;
pub mod types;

pub use client::{TmdbAuth, TmdbClient};
pub use error::TmdbError;
