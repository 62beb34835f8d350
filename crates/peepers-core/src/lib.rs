pub mod config;
pub mod error;
pub mod featured;
pub mod mapper;
pub mod models;
pub mod overlay;
pub mod pagination;
pub mod query;
pub mod theme;
