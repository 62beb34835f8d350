use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use peepers_api::tmdb::types::TmdbKind;

/// The three browsable catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Series,
    Anime,
}

impl MediaKind {
    /// TMDB namespace for this kind; anime is served by AniList instead.
    pub fn tmdb(self) -> Option<TmdbKind> {
        match self {
            Self::Movie => Some(TmdbKind::Movie),
            Self::Series => Some(TmdbKind::Tv),
            Self::Anime => None,
        }
    }

    /// First segment of the detail route (`/movie/:id`, `/series/:id`, `/anime/:id`).
    pub fn route_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Anime => "anime",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "Movie"),
            Self::Series => write!(f, "Series"),
            Self::Anime => write!(f, "Anime"),
        }
    }
}

/// Series pseudo-genre for Korean dramas.
pub const KDRAMA_TAG: &str = "kdrama";

/// A list filter: a catalog genre id or a named pseudo-genre.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterId {
    Genre(u64),
    Tag(String),
}

impl FilterId {
    /// Extra TMDB discover parameters for this filter.
    ///
    /// Returns `None` for a tag this build doesn't know about.
    pub fn discover_params(&self) -> Option<Vec<(&'static str, String)>> {
        match self {
            Self::Genre(id) => Some(vec![("with_genres", id.to_string())]),
            Self::Tag(tag) if tag == KDRAMA_TAG => {
                Some(vec![("with_original_language", "ko".to_string())])
            }
            Self::Tag(_) => None,
        }
    }
}

impl FromStr for FilterId {
    type Err = std::convert::Infallible;

    /// Numeric input is a genre id, anything else is a tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(id) => Self::Genre(id),
            Err(_) => Self::Tag(s.to_lowercase()),
        })
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genre(id) => write!(f, "{id}"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// Everything that determines what a list controller fetches next.
///
/// Two keys are the same query iff every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Always stored trimmed.
    pub search_text: String,
    /// 1-based.
    pub page: u32,
    pub filter: Option<FilterId>,
    pub kind: MediaKind,
}

impl QueryKey {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            search_text: String::new(),
            page: 1,
            filter: None,
            kind,
        }
    }

    pub fn is_search(&self) -> bool {
        !self.search_text.is_empty()
    }
}

/// Genre id → display name.
pub type GenreMap = HashMap<u64, String>;

/// One entry of a genre menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreOption {
    pub id: FilterId,
    pub name: String,
}

/// A member of the featured rotation pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedCandidate {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!("28".parse::<FilterId>().unwrap(), FilterId::Genre(28));
        assert_eq!(
            " KDrama ".parse::<FilterId>().unwrap(),
            FilterId::Tag("kdrama".into())
        );
    }

    #[test]
    fn test_discover_params() {
        assert_eq!(
            FilterId::Genre(18).discover_params(),
            Some(vec![("with_genres", "18".to_string())])
        );
        assert_eq!(
            FilterId::Tag(KDRAMA_TAG.into()).discover_params(),
            Some(vec![("with_original_language", "ko".to_string())])
        );
        assert_eq!(FilterId::Tag("anthology".into()).discover_params(), None);
    }

    #[test]
    fn test_query_key_identity() {
        let a = QueryKey::new(MediaKind::Movie);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.page = 2;
        assert_ne!(a, b);
    }

    #[test]
    fn test_tmdb_namespace() {
        assert_eq!(MediaKind::Series.tmdb(), Some(TmdbKind::Tv));
        assert_eq!(MediaKind::Anime.tmdb(), None);
    }
}
