//! Page-level fetches: one or more catalog calls mapped into view models.

use futures::try_join;
use peepers_api::tmdb::types::{PagedResponse, TmdbKind, TmdbMedia};
use peepers_api::traits::{AnimeCatalog, FilmCatalog};
use peepers_core::error::FetchError;
use peepers_core::featured::{FeaturedDetail, FeaturedKey};
use peepers_core::mapper::{self, LIST_PAGE_SIZE};
use peepers_core::models::{
    CardPage, CardViewModel, CuratedEntry, DetailViewModel, FeaturedCandidate, FilterId,
    GenreMap, GenreOption, MediaKind, QueryKey, UpcomingEntry, KDRAMA_TAG,
};

const HOME_TRENDING: usize = 6;
const HOME_UPCOMING: usize = 3;
const HOME_CURATED: usize = 4;
const QUICK_SEARCH_RESULTS: usize = 6;

/// Everything the home page loads in one go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomeData {
    pub trending: Vec<CardViewModel>,
    pub pool: Vec<FeaturedCandidate>,
    pub upcoming: Vec<UpcomingEntry>,
    pub curated: Vec<CuratedEntry>,
}

/// Both catalog services behind one façade.
pub struct Catalog<F, A> {
    films: F,
    anime: A,
    anime_per_page: u32,
}

impl<F: FilmCatalog, A: AnimeCatalog> Catalog<F, A> {
    pub fn new(films: F, anime: A) -> Self {
        Self {
            films,
            anime,
            anime_per_page: LIST_PAGE_SIZE as u32,
        }
    }

    pub fn with_anime_per_page(mut self, per_page: u32) -> Self {
        self.anime_per_page = per_page.max(1);
        self
    }

    /// One page of a list, chosen by the key: search text first, then the
    /// filter, then the popular feed.
    pub async fn list_page(&self, key: &QueryKey) -> Result<CardPage, FetchError> {
        let Some(tmdb) = key.kind.tmdb() else {
            return self.anime_list_page(key).await;
        };

        let resp = if key.is_search() {
            self.films.search(tmdb, &key.search_text, key.page).await
        } else {
            match key.filter.as_ref().map(|f| (f, f.discover_params())) {
                Some((_, Some(params))) => self.films.discover(tmdb, &params, key.page).await,
                Some((filter, None)) => {
                    tracing::warn!(%filter, "unknown filter tag, showing popular titles");
                    self.films.popular(tmdb, key.page).await
                }
                None => self.films.popular(tmdb, key.page).await,
            }
        };
        let resp = resp.map_err(FetchError::from_service)?;

        Ok(card_page(key.kind, resp))
    }

    async fn anime_list_page(&self, key: &QueryKey) -> Result<CardPage, FetchError> {
        let page = self
            .anime
            .anime_page(key.page, self.anime_per_page, Some(key.search_text.as_str()))
            .await
            .map_err(FetchError::from_service)?;

        Ok(CardPage {
            items: page
                .media
                .iter()
                .take(LIST_PAGE_SIZE)
                .map(mapper::anime_card)
                .collect(),
            total_pages: page.page_info.last_page.unwrap_or(1),
        })
    }

    /// Genre menu entries. Series also get the K-Drama pseudo-genre and
    /// are sorted by name; anime has no genre menu.
    pub async fn genre_options(&self, kind: MediaKind) -> Result<Vec<GenreOption>, FetchError> {
        let Some(tmdb) = kind.tmdb() else {
            return Ok(Vec::new());
        };
        let list = self
            .films
            .genres(tmdb)
            .await
            .map_err(FetchError::from_service)?;

        let mut options: Vec<GenreOption> = list
            .genres
            .into_iter()
            .map(|g| GenreOption {
                id: FilterId::Genre(g.id),
                name: g.name,
            })
            .collect();

        if kind == MediaKind::Series {
            options.push(GenreOption {
                id: FilterId::Tag(KDRAMA_TAG.to_string()),
                name: "K-Drama".to_string(),
            });
            options.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(options)
    }

    /// Trending, upcoming, now playing and the genre table, concurrently.
    pub async fn home(&self) -> Result<HomeData, FetchError> {
        let (trending, upcoming, now_playing, genres) = try_join!(
            self.films.trending(TmdbKind::Movie),
            self.films.upcoming(),
            self.films.now_playing(),
            self.films.genres(TmdbKind::Movie),
        )
        .map_err(FetchError::from_service)?;

        let genres: GenreMap = genres.genres.into_iter().map(|g| (g.id, g.name)).collect();
        let top: Vec<&TmdbMedia> = trending.results.iter().take(HOME_TRENDING).collect();

        Ok(HomeData {
            trending: top.iter().map(|m| mapper::home_card(m, &genres)).collect(),
            pool: top.iter().map(|m| mapper::featured_candidate(m)).collect(),
            upcoming: upcoming
                .results
                .iter()
                .take(HOME_UPCOMING)
                .map(mapper::upcoming_entry)
                .collect(),
            curated: now_playing
                .results
                .iter()
                .take(HOME_CURATED)
                .map(|m| mapper::curated_entry(m, &genres))
                .collect(),
        })
    }

    /// Full detail record. Movies and series merge four calls; a failure
    /// of any one fails the whole load.
    pub async fn detail(&self, kind: MediaKind, id: u64) -> Result<DetailViewModel, FetchError> {
        let Some(tmdb) = kind.tmdb() else {
            let media = self
                .anime
                .anime_detail(id)
                .await
                .map_err(FetchError::from_service)?;
            return Ok(mapper::anime_detail(&media));
        };

        let (details, images, similar, videos) = try_join!(
            self.films.details(tmdb, id),
            self.films.images(tmdb, id),
            self.films.similar(tmdb, id),
            self.films.videos(tmdb, id),
        )
        .map_err(FetchError::from_service)?;

        Ok(mapper::media_detail(
            kind,
            &details,
            &images,
            &similar.results,
            &videos,
        ))
    }

    pub async fn featured_detail(&self, key: &FeaturedKey) -> Result<FeaturedDetail, FetchError> {
        let id = key.candidate.id;
        let (details, videos) = try_join!(
            self.films.details(TmdbKind::Movie, id),
            self.films.videos(TmdbKind::Movie, id),
        )
        .map_err(FetchError::from_service)?;
        Ok(mapper::featured_detail(&details, &videos))
    }

    /// Header dropdown: the first few movie matches.
    pub async fn quick_search(&self, text: &str) -> Result<Vec<CardViewModel>, FetchError> {
        let resp = self
            .films
            .search(TmdbKind::Movie, text, 1)
            .await
            .map_err(FetchError::from_service)?;
        Ok(resp
            .results
            .iter()
            .take(QUICK_SEARCH_RESULTS)
            .map(mapper::movie_card)
            .collect())
    }
}

fn card_page(kind: MediaKind, resp: PagedResponse<TmdbMedia>) -> CardPage {
    let card = match kind {
        MediaKind::Series => mapper::series_card,
        _ => mapper::movie_card,
    };
    CardPage {
        items: resp.results.iter().take(LIST_PAGE_SIZE).map(card).collect(),
        total_pages: resp.total_pages.unwrap_or(1),
    }
}
