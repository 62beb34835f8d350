use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::AniListError;
use super::types::{AniListMedia, AnimePage, GraphQLResponse, MediaResponse, PageResponse};
use crate::traits::AnimeCatalog;

pub const DEFAULT_API_URL: &str = "https://graphql.anilist.co";

const ANIME_PAGE_QUERY: &str = r#"
query ($page: Int, $perPage: Int, $search: String) {
    Page(page: $page, perPage: $perPage) {
        pageInfo { total currentPage lastPage }
        media(type: ANIME, search: $search, sort: POPULARITY_DESC) {
            id
            title { romaji english native }
            startDate { year }
            averageScore
            genres
            coverImage { extraLarge large }
            bannerImage
        }
    }
}
"#;

const ANIME_DETAIL_QUERY: &str = r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        id
        title { romaji english native }
        description(asHtml: false)
        startDate { year }
        averageScore
        genres
        episodes
        duration
        status
        trailer { id site }
        coverImage { extraLarge large }
        bannerImage
    }
}
"#;

/// AniList GraphQL API client. Only public, unauthenticated queries are used.
pub struct AniListClient {
    api_url: String,
    http: Client,
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AniListClient {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    async fn graphql_request<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let resp = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(AniListError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        let envelope = resp
            .json::<GraphQLResponse<T>>()
            .await
            .map_err(|e| AniListError::Parse(e.to_string()))?;
        unwrap_envelope(operation, envelope)
    }
}

/// Reject responses carrying an `errors` field, then require `data`.
fn unwrap_envelope<T>(operation: &str, envelope: GraphQLResponse<T>) -> Result<T, AniListError> {
    if let Some(errors) = envelope.errors {
        tracing::warn!(operation, count = errors.len(), "AniList GraphQL errors");
        return Err(AniListError::GraphQl(
            errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    envelope
        .data
        .ok_or_else(|| AniListError::Parse("response has no data".into()))
}

impl AnimeCatalog for AniListClient {
    type Error = AniListError;

    async fn anime_page(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
    ) -> Result<AnimePage, AniListError> {
        // AniList treats an empty search string as "match nothing", so send null.
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let resp: PageResponse = self
            .graphql_request(
                "AnimePage",
                ANIME_PAGE_QUERY,
                serde_json::json!({
                    "page": page.max(1),
                    "perPage": per_page,
                    "search": search,
                }),
            )
            .await?;
        Ok(resp.page)
    }

    async fn anime_detail(&self, id: u64) -> Result<AniListMedia, AniListError> {
        let resp: MediaResponse = self
            .graphql_request(
                "AnimeDetail",
                ANIME_DETAIL_QUERY,
                serde_json::json!({ "id": id }),
            )
            .await?;
        Ok(resp.media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_errors_is_protocol_error() {
        let json = r#"{ "errors": [{ "message": "Not Found." }], "data": { "Media": null } }"#;
        let envelope: GraphQLResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        match unwrap_envelope("AnimeDetail", envelope) {
            Err(AniListError::GraphQl(messages)) => assert_eq!(messages, vec!["Not Found."]),
            other => panic!("Expected GraphQl error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_without_data() {
        let json = r#"{ "data": null }"#;
        let envelope: GraphQLResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            unwrap_envelope("AnimePage", envelope),
            Err(AniListError::Parse(_))
        ));
    }

    #[test]
    fn test_envelope_with_data() {
        let json = r#"{ "data": { "Page": { "pageInfo": { "lastPage": 3 }, "media": [] } } }"#;
        let envelope: GraphQLResponse<PageResponse> = serde_json::from_str(json).unwrap();
        let page = unwrap_envelope("AnimePage", envelope).unwrap().page;
        assert_eq!(page.page_info.last_page, Some(3));
        assert!(page.media.is_empty());
    }

    #[test]
    fn test_error_kinds() {
        use crate::error::{ErrorKind, ServiceError};

        assert_eq!(AniListError::GraphQl(vec![]).kind(), ErrorKind::Protocol);
        assert_eq!(
            AniListError::Api {
                status: 500,
                message: String::new()
            }
            .kind(),
            ErrorKind::Network
        );
    }
}
