use reqwest::{Client, Request};
use serde::de::DeserializeOwned;

use super::error::TmdbError;
use super::types::{
    GenreList, ImagesResponse, PagedResponse, TmdbDetails, TmdbKind, TmdbMedia, VideosResponse,
};
use crate::traits::FilmCatalog;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// How requests are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmdbAuth {
    /// v4 read access token, sent as a bearer token.
    ReadToken(String),
    /// v3 api key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// Unauthenticated (only useful against a local stand-in).
    Anonymous,
}

impl TmdbAuth {
    /// Pick the read token if present, else the api key. Blank values count as absent.
    pub fn from_credentials(read_token: Option<&str>, api_key: Option<&str>) -> Self {
        let present = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
        match (present(read_token), present(api_key)) {
            (Some(token), _) => Self::ReadToken(token),
            (None, Some(key)) => Self::ApiKey(key),
            (None, None) => Self::Anonymous,
        }
    }
}

/// TMDB v3 REST client.
pub struct TmdbClient {
    auth: TmdbAuth,
    base_url: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(auth: TmdbAuth) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another host (trailing slashes are ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the GET request for `path` with the given query parameters.
    fn build_request(&self, path: &str, params: &[(&str, String)]) -> Result<Request, TmdbError> {
        let mut query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        if let TmdbAuth::ApiKey(key) = &self.auth {
            query.push(("api_key", key.as_str()));
        }

        let mut builder = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header("Accept", "application/json");
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let TmdbAuth::ReadToken(token) = &self.auth {
            builder = builder.bearer_auth(token);
        }
        Ok(builder.build()?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        tracing::debug!(operation, path, "TMDB request");

        let request = self.build_request(path, params)?;
        let resp = self.http.execute(request).await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "TMDB API error");
            return Err(TmdbError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "TMDB response received");
        resp.json::<T>()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }
}

fn page_param(page: u32) -> (&'static str, String) {
    ("page", page.max(1).to_string())
}

impl FilmCatalog for TmdbClient {
    type Error = TmdbError;

    async fn trending(&self, kind: TmdbKind) -> Result<PagedResponse<TmdbMedia>, TmdbError> {
        let path = format!("/trending/{}/week", kind.path_segment());
        self.get("Trending", &path, &[]).await
    }

    async fn popular(&self, kind: TmdbKind, page: u32) -> Result<PagedResponse<TmdbMedia>, TmdbError> {
        let path = format!("/{}/popular", kind.path_segment());
        self.get("Popular", &path, &[page_param(page)]).await
    }

    async fn upcoming(&self) -> Result<PagedResponse<TmdbMedia>, TmdbError> {
        self.get("Upcoming", "/movie/upcoming", &[]).await
    }

    async fn now_playing(&self) -> Result<PagedResponse<TmdbMedia>, TmdbError> {
        self.get("NowPlaying", "/movie/now_playing", &[]).await
    }

    async fn genres(&self, kind: TmdbKind) -> Result<GenreList, TmdbError> {
        let path = format!("/genre/{}/list", kind.path_segment());
        self.get("Genres", &path, &[]).await
    }

    async fn details(&self, kind: TmdbKind, id: u64) -> Result<TmdbDetails, TmdbError> {
        let path = format!("/{}/{id}", kind.path_segment());
        self.get("Details", &path, &[]).await
    }

    async fn images(&self, kind: TmdbKind, id: u64) -> Result<ImagesResponse, TmdbError> {
        let path = format!("/{}/{id}/images", kind.path_segment());
        self.get("Images", &path, &[]).await
    }

    async fn similar(&self, kind: TmdbKind, id: u64) -> Result<PagedResponse<TmdbMedia>, TmdbError> {
        let path = format!("/{}/{id}/similar", kind.path_segment());
        self.get("Similar", &path, &[]).await
    }

    async fn videos(&self, kind: TmdbKind, id: u64) -> Result<VideosResponse, TmdbError> {
        let path = format!("/{}/{id}/videos", kind.path_segment());
        self.get("Videos", &path, &[]).await
    }

    async fn discover(
        &self,
        kind: TmdbKind,
        filters: &[(&str, String)],
        page: u32,
    ) -> Result<PagedResponse<TmdbMedia>, TmdbError> {
        let path = format!("/discover/{}", kind.path_segment());
        let mut params = vec![("sort_by", "popularity.desc".to_string()), page_param(page)];
        params.extend(filters.iter().map(|(k, v)| (*k, v.clone())));
        self.get("Discover", &path, &params).await
    }

    async fn search(
        &self,
        kind: TmdbKind,
        query: &str,
        page: u32,
    ) -> Result<PagedResponse<TmdbMedia>, TmdbError> {
        let path = format!("/search/{}", kind.path_segment());
        let params = [
            ("query", query.to_string()),
            page_param(page),
            ("include_adult", "false".to_string()),
        ];
        self.get("Search", &path, &params).await
    }
}
