use serde::Deserialize;

// ── GraphQL response wrappers ────────────────────────────────────

/// Envelope of every AniList response. `errors` is checked before `data`.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLErrorEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLErrorEntry {
    #[serde(default)]
    pub message: String,
}

// ── Page query ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: AnimePage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimePage {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    #[serde(default)]
    pub media: Vec<AniListMedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    pub total: Option<u32>,
    #[serde(rename = "currentPage")]
    pub current_page: Option<u32>,
    #[serde(rename = "lastPage")]
    pub last_page: Option<u32>,
}

// ── Media ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: AniListMedia,
}

/// One anime record. List queries fill the card fields only; the detail
/// query also fills description, episodes, duration, status and trailer.
#[derive(Debug, Clone, Deserialize)]
pub struct AniListMedia {
    pub id: u64,
    pub title: Option<AniListTitle>,
    pub description: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<FuzzyDate>,
    #[serde(rename = "averageScore")]
    pub average_score: Option<u32>,
    pub genres: Option<Vec<String>>,
    pub episodes: Option<u32>,
    pub duration: Option<u32>,
    pub status: Option<String>,
    pub trailer: Option<AniListTrailer>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<CoverImage>,
    #[serde(rename = "bannerImage")]
    pub banner_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverImage {
    #[serde(rename = "extraLarge")]
    pub extra_large: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListTrailer {
    pub id: Option<String>,
    pub site: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl AniListTitle {
    /// English title, then romaji, then native.
    pub fn preferred(&self) -> Option<&str> {
        non_empty(&self.english)
            .or_else(|| non_empty(&self.romaji))
            .or_else(|| non_empty(&self.native))
    }
}

impl AniListMedia {
    pub fn preferred_title(&self) -> Option<&str> {
        self.title.as_ref().and_then(AniListTitle::preferred)
    }

    /// Best cover art: extra large, then large, then the banner.
    pub fn cover_url(&self) -> Option<&str> {
        self.cover_image
            .as_ref()
            .and_then(|c| non_empty(&c.extra_large).or_else(|| non_empty(&c.large)))
            .or_else(|| non_empty(&self.banner_image))
    }

    pub fn start_year(&self) -> Option<u32> {
        self.start_date.as_ref().and_then(|d| d.year)
    }
}
