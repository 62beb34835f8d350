//! In-memory stand-in for both catalog services.
//!
//! Every call is recorded as a label such as `search:movie:dune:1`. Calls
//! can be delayed (tokio time, so paused-clock tests stay instant) or made
//! to fail by label prefix.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use peepers_api::anilist::types::{AniListMedia, AnimePage};
use peepers_api::error::{ErrorKind, ServiceError};
use peepers_api::tmdb::types::{
    GenreList, ImagesResponse, PagedResponse, TmdbDetails, TmdbKind, TmdbMedia, VideosResponse,
};
use peepers_api::traits::{AnimeCatalog, FilmCatalog};
use peepers_core::config::Timing;
use serde_json::json;

use crate::{Catalog, Runtime};

#[derive(Debug, thiserror::Error)]
#[error("fake failure: {0}")]
pub(crate) struct FakeError(String);

impl ServiceError for FakeError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Network
    }
}

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<Vec<String>>,
    trending: Mutex<Vec<String>>,
    total_pages: Mutex<u32>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeCatalog {
    inner: Arc<Inner>,
}

pub(crate) const TEST_TIMING: Timing = Timing {
    debounce: Duration::from_millis(350),
    rotation: Duration::from_secs(10),
};

impl FakeCatalog {
    pub(crate) fn new() -> Self {
        let fake = Self::default();
        fake.set_total_pages(5);
        fake.set_trending(&["A", "B", "C"]);
        fake
    }

    pub(crate) fn runtime(&self) -> Runtime<FakeCatalog, FakeCatalog> {
        Runtime::new(Catalog::new(self.clone(), self.clone()), TEST_TIMING)
    }

    pub(crate) fn set_total_pages(&self, total: u32) {
        *self.inner.total_pages.lock().unwrap() = total;
    }

    /// Trending titles get ids 1, 2, 3, ... in order.
    pub(crate) fn set_trending(&self, titles: &[&str]) {
        *self.inner.trending.lock().unwrap() = titles.iter().map(|t| t.to_string()).collect();
    }

    pub(crate) fn delay(&self, label: &str, delay: Duration) {
        self.inner
            .delays
            .lock()
            .unwrap()
            .insert(label.to_string(), delay);
    }

    pub(crate) fn fail(&self, prefix: &str) {
        self.inner.failures.lock().unwrap().push(prefix.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn title_for(&self, id: u64) -> String {
        let trending = self.inner.trending.lock().unwrap();
        usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| trending.get(i).cloned())
            .unwrap_or_else(|| format!("Title {id}"))
    }

    /// Record the call, wait out its delay, then apply any failure.
    async fn call(&self, label: String) -> Result<(), FakeError> {
        self.inner.calls.lock().unwrap().push(label.clone());
        let delay = self.inner.delays.lock().unwrap().get(&label).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failed = self
            .inner
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|p| label.starts_with(p.as_str()));
        if failed {
            return Err(FakeError(label));
        }
        Ok(())
    }

    fn paged(&self, label: &str, page: u32) -> PagedResponse<TmdbMedia> {
        let total = *self.inner.total_pages.lock().unwrap();
        let results: Vec<_> = (1..=10u64)
            .map(|i| {
                json!({
                    "id": u64::from(page) * 100 + i,
                    "title": format!("{label} #{i}"),
                    "vote_average": 7.0,
                    "release_date": "2024-05-01",
                    "genre_ids": [28],
                })
            })
            .collect();
        serde_json::from_value(json!({
            "page": page,
            "results": results,
            "total_pages": total,
        }))
        .unwrap()
    }
}

fn seg(kind: TmdbKind) -> &'static str {
    kind.path_segment()
}

impl FilmCatalog for FakeCatalog {
    type Error = FakeError;

    async fn trending(&self, kind: TmdbKind) -> Result<PagedResponse<TmdbMedia>, FakeError> {
        self.call(format!("trending:{}", seg(kind))).await?;
        let trending = self.inner.trending.lock().unwrap().clone();
        let results: Vec<_> = trending
            .iter()
            .enumerate()
            .map(|(i, title)| json!({ "id": i + 1, "title": title, "genre_ids": [28, 12] }))
            .collect();
        Ok(serde_json::from_value(json!({ "page": 1, "results": results, "total_pages": 1 })).unwrap())
    }

    async fn popular(&self, kind: TmdbKind, page: u32) -> Result<PagedResponse<TmdbMedia>, FakeError> {
        let label = format!("popular:{}:{page}", seg(kind));
        self.call(label.clone()).await?;
        Ok(self.paged(&label, page))
    }

    async fn upcoming(&self) -> Result<PagedResponse<TmdbMedia>, FakeError> {
        self.call("upcoming".into()).await?;
        Ok(self.paged("upcoming", 1))
    }

    async fn now_playing(&self) -> Result<PagedResponse<TmdbMedia>, FakeError> {
        self.call("now_playing".into()).await?;
        Ok(self.paged("now_playing", 1))
    }

    async fn genres(&self, kind: TmdbKind) -> Result<GenreList, FakeError> {
        self.call(format!("genres:{}", seg(kind))).await?;
        Ok(serde_json::from_value(json!({
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 12, "name": "Adventure" },
                { "id": 18, "name": "Drama" },
            ]
        }))
        .unwrap())
    }

    async fn details(&self, kind: TmdbKind, id: u64) -> Result<TmdbDetails, FakeError> {
        self.call(format!("details:{}:{id}", seg(kind))).await?;
        Ok(serde_json::from_value(json!({
            "id": id,
            "title": self.title_for(id),
            "runtime": 120,
            "genres": [{ "id": 18, "name": "Drama" }],
        }))
        .unwrap())
    }

    async fn images(&self, kind: TmdbKind, id: u64) -> Result<ImagesResponse, FakeError> {
        self.call(format!("images:{}:{id}", seg(kind))).await?;
        Ok(serde_json::from_value(json!({
            "backdrops": [{ "file_path": "/one.jpg" }, { "file_path": "/two.jpg" }]
        }))
        .unwrap())
    }

    async fn similar(&self, kind: TmdbKind, id: u64) -> Result<PagedResponse<TmdbMedia>, FakeError> {
        let label = format!("similar:{}:{id}", seg(kind));
        self.call(label.clone()).await?;
        Ok(self.paged(&label, 1))
    }

    async fn videos(&self, kind: TmdbKind, id: u64) -> Result<VideosResponse, FakeError> {
        self.call(format!("videos:{}:{id}", seg(kind))).await?;
        Ok(serde_json::from_value(json!({
            "results": [{ "key": format!("yt-{id}"), "site": "YouTube", "type": "Trailer" }]
        }))
        .unwrap())
    }

    async fn discover(
        &self,
        kind: TmdbKind,
        filters: &[(&str, String)],
        page: u32,
    ) -> Result<PagedResponse<TmdbMedia>, FakeError> {
        let filters: Vec<String> = filters.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let label = format!("discover:{}:{}:{page}", seg(kind), filters.join("&"));
        self.call(label.clone()).await?;
        Ok(self.paged(&label, page))
    }

    async fn search(
        &self,
        kind: TmdbKind,
        query: &str,
        page: u32,
    ) -> Result<PagedResponse<TmdbMedia>, FakeError> {
        let label = format!("search:{}:{query}:{page}", seg(kind));
        self.call(label.clone()).await?;
        Ok(self.paged(&label, page))
    }
}

impl AnimeCatalog for FakeCatalog {
    type Error = FakeError;

    async fn anime_page(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
    ) -> Result<AnimePage, FakeError> {
        let search = search.filter(|s| !s.is_empty()).unwrap_or("-");
        self.call(format!("anime_page:{page}:{per_page}:{search}")).await?;
        let media: Vec<_> = (1..=per_page)
            .map(|i| {
                json!({
                    "id": u64::from(page) * 100 + u64::from(i),
                    "title": { "romaji": format!("Anime {i}") },
                    "averageScore": 80,
                    "genres": ["Action"],
                })
            })
            .collect();
        Ok(serde_json::from_value(json!({
            "pageInfo": { "lastPage": *self.inner.total_pages.lock().unwrap() },
            "media": media,
        }))
        .unwrap())
    }

    async fn anime_detail(&self, id: u64) -> Result<AniListMedia, FakeError> {
        self.call(format!("anime_detail:{id}")).await?;
        Ok(serde_json::from_value(json!({
            "id": id,
            "title": { "english": "Frieren" },
            "description": "An <b>elf</b> mage.",
            "episodes": 28,
            "duration": 24,
        }))
        .unwrap())
    }
}
