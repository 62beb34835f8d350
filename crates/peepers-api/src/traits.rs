//! Trait definitions for the two catalog services.
//!
//! `TmdbClient` and `AniListClient` implement these, which lets the runtime
//! drive its sessions against either the real services or an in-memory fake.

use std::future::Future;

use crate::anilist::types::{AniListMedia, AnimePage};
use crate::error::ServiceError;
use crate::tmdb::types::{
    GenreList, ImagesResponse, PagedResponse, TmdbDetails, TmdbKind, TmdbMedia, VideosResponse,
};

/// Read-only film/TV metadata service.
pub trait FilmCatalog: Send + Sync + 'static {
    type Error: ServiceError;

    /// Weekly trending titles.
    fn trending(
        &self,
        kind: TmdbKind,
    ) -> impl Future<Output = Result<PagedResponse<TmdbMedia>, Self::Error>> + Send;

    /// Popular titles, one page at a time.
    fn popular(
        &self,
        kind: TmdbKind,
        page: u32,
    ) -> impl Future<Output = Result<PagedResponse<TmdbMedia>, Self::Error>> + Send;

    /// Movies about to be released.
    fn upcoming(&self)
        -> impl Future<Output = Result<PagedResponse<TmdbMedia>, Self::Error>> + Send;

    /// Movies currently in theaters.
    fn now_playing(
        &self,
    ) -> impl Future<Output = Result<PagedResponse<TmdbMedia>, Self::Error>> + Send;

    /// The genre id → name table for a media kind.
    fn genres(&self, kind: TmdbKind) -> impl Future<Output = Result<GenreList, Self::Error>> + Send;

    fn details(
        &self,
        kind: TmdbKind,
        id: u64,
    ) -> impl Future<Output = Result<TmdbDetails, Self::Error>> + Send;

    fn images(
        &self,
        kind: TmdbKind,
        id: u64,
    ) -> impl Future<Output = Result<ImagesResponse, Self::Error>> + Send;

    fn similar(
        &self,
        kind: TmdbKind,
        id: u64,
    ) -> impl Future<Output = Result<PagedResponse<TmdbMedia>, Self::Error>> + Send;

    fn videos(
        &self,
        kind: TmdbKind,
        id: u64,
    ) -> impl Future<Output = Result<VideosResponse, Self::Error>> + Send;

    /// Popularity-sorted discovery with extra filter parameters
    /// (e.g. `with_genres`, `with_original_language`).
    fn discover(
        &self,
        kind: TmdbKind,
        filters: &[(&str, String)],
        page: u32,
    ) -> impl Future<Output = Result<PagedResponse<TmdbMedia>, Self::Error>> + Send;

    /// Title search.
    fn search(
        &self,
        kind: TmdbKind,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<PagedResponse<TmdbMedia>, Self::Error>> + Send;
}

/// Read-only anime metadata service.
pub trait AnimeCatalog: Send + Sync + 'static {
    type Error: ServiceError;

    /// One page of popularity-sorted anime, optionally filtered by a search term.
    fn anime_page(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
    ) -> impl Future<Output = Result<AnimePage, Self::Error>> + Send;

    /// Full record for one anime.
    fn anime_detail(&self, id: u64) -> impl Future<Output = Result<AniListMedia, Self::Error>> + Send;
}
