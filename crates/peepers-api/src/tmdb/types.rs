use serde::Deserialize;

/// The two TMDB media namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TmdbKind {
    Movie,
    Tv,
}

impl TmdbKind {
    /// Path segment used by TMDB endpoints (`/movie/...`, `/tv/...`).
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

// ── Paged list responses ─────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u32>,
}

/// A list entry. Movies carry `title`/`release_date`, series carry
/// `name`/`first_air_date`; both are optional so one type covers both.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMedia {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    pub overview: Option<String>,
}

// ── Genres ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

// ── Single title ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub runtime: Option<u32>,
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub status: Option<String>,
    pub original_language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub backdrops: Vec<ImageEntry>,
    #[serde(default)]
    pub posters: Vec<ImageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideosResponse {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "type")]
    pub video_type: Option<String>,
    pub name: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

impl TmdbMedia {
    /// Display title regardless of whether this is a movie or a series.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Release date for movies, first air date for series.
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }
}

impl TmdbDetails {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_movie_page() {
        let json = r#"{
            "page": 1,
            "results": [
                {
                    "id": 438631,
                    "title": "Dune",
                    "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                    "backdrop_path": "/jYEW5xZkZk2WTrdbMGAPFuBqbDc.jpg",
                    "vote_average": 7.8,
                    "release_date": "2021-09-15",
                    "genre_ids": [878, 12],
                    "overview": "Paul Atreides, a brilliant and gifted young man..."
                }
            ],
            "total_pages": 5,
            "total_results": 98
        }"#;

        let resp: PagedResponse<TmdbMedia> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.total_pages, Some(5));
        assert_eq!(resp.results.len(), 1);

        let dune = &resp.results[0];
        assert_eq!(dune.display_title(), "Dune");
        assert_eq!(dune.date(), Some("2021-09-15"));
        assert_eq!(dune.genre_ids, vec![878, 12]);
    }

    #[test]
    fn test_deserialize_series_entry() {
        let json = r#"{ "id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20" }"#;
        let show: TmdbMedia = serde_json::from_str(json).unwrap();
        assert_eq!(show.display_title(), "Breaking Bad");
        assert_eq!(show.date(), Some("2008-01-20"));
        assert!(show.genre_ids.is_empty());
        assert!(show.vote_average.is_none());
    }

    #[test]
    fn test_empty_date_is_absent() {
        let json = r#"{ "id": 1, "title": "Untitled", "release_date": "" }"#;
        let movie: TmdbMedia = serde_json::from_str(json).unwrap();
        assert_eq!(movie.date(), None);
    }

    #[test]
    fn test_deserialize_videos() {
        let json = r#"{
            "id": 438631,
            "results": [
                { "key": "n9xhJrPXop4", "site": "YouTube", "type": "Trailer", "name": "Main Trailer" },
                { "key": "abc", "site": "Vimeo", "type": "Teaser" }
            ]
        }"#;
        let videos: VideosResponse = serde_json::from_str(json).unwrap();
        assert_eq!(videos.results.len(), 2);
        assert_eq!(videos.results[0].video_type.as_deref(), Some("Trailer"));
    }

    #[test]
    fn test_deserialize_details_without_optional_fields() {
        let json = r#"{ "id": 7, "title": "Minimal" }"#;
        let details: TmdbDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.display_title(), "Minimal");
        assert!(details.genres.is_empty());
        assert!(details.runtime.is_none());
    }
}
