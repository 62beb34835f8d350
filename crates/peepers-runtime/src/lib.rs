//! Drives the pure controllers from `peepers-core` on tokio.
//!
//! A [`Runtime`] opens sessions, one per page. Sessions must be opened from
//! within a tokio runtime.

mod catalog;
mod driver;
pub mod session;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use peepers_api::anilist::AniListClient;
use peepers_api::tmdb::{TmdbAuth, TmdbClient};
use peepers_api::traits::{AnimeCatalog, FilmCatalog};
use peepers_core::config::{AppConfig, Timing};
use peepers_core::models::{FilterId, MediaKind};

pub use catalog::{Catalog, HomeData};
pub use session::{
    DetailHandle, DetailState, HomeHandle, HomeState, ListHandle, ListOptions, ListPageState,
    QuickSearchHandle, QuickSearchState,
};

pub struct Runtime<F, A> {
    catalog: Arc<Catalog<F, A>>,
    timing: Timing,
}

impl Runtime<TmdbClient, AniListClient> {
    /// Real TMDB and AniList clients configured from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let auth = TmdbAuth::from_credentials(config.tmdb.read_token(), config.tmdb.api_key());
        if auth == TmdbAuth::Anonymous {
            tracing::warn!("no TMDB credentials configured; movie and series requests will fail");
        }

        let films = TmdbClient::new(auth).with_base_url(&config.tmdb.base_url);
        let anime = AniListClient::new().with_api_url(&config.anilist.api_url);
        let catalog = Catalog::new(films, anime).with_anime_per_page(config.anilist.per_page);

        Self::new(catalog, config.timing.timing())
    }
}

impl<F: FilmCatalog, A: AnimeCatalog> Runtime<F, A> {
    pub fn new(catalog: Catalog<F, A>, timing: Timing) -> Self {
        Self {
            catalog: Arc::new(catalog),
            timing,
        }
    }

    /// Movies, series or anime list page.
    pub fn open_list(&self, kind: MediaKind, options: ListOptions) -> ListHandle {
        session::spawn_list(Arc::clone(&self.catalog), kind, self.timing.debounce, options)
    }

    /// Movies in one genre. Search and filter actions are ignored.
    pub fn open_genre(&self, genre_id: u64) -> ListHandle {
        self.open_list(
            MediaKind::Movie,
            ListOptions {
                filter: Some(FilterId::Genre(genre_id)),
                locked: true,
                ..Default::default()
            },
        )
    }

    pub fn open_home(&self) -> HomeHandle {
        session::spawn_home(Arc::clone(&self.catalog), self.timing.rotation)
    }

    /// Movie or series detail (four merged calls), or anime detail.
    pub fn open_detail(&self, kind: MediaKind, id: u64) -> DetailHandle {
        session::spawn_detail(Arc::clone(&self.catalog), kind, id)
    }

    pub fn open_quick_search(&self) -> QuickSearchHandle {
        session::spawn_quick_search(Arc::clone(&self.catalog), self.timing.debounce)
    }
}
