use crate::error::ErrorKind;
use crate::query::Phase;

use super::MediaKind;

/// Whether a card navigates somewhere.
///
/// Resolved once here so presentation never branches on "has an id".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLink {
    Linked { kind: MediaKind, id: u64 },
    Unlinked,
}

impl CardLink {
    /// Detail route for a linked card.
    pub fn route(&self) -> Option<String> {
        match self {
            Self::Linked { kind, id } => Some(format!("/{}/{id}", kind.route_segment())),
            Self::Unlinked => None,
        }
    }
}

/// Display-ready projection of one catalog entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardViewModel {
    pub link: CardLink,
    pub title: String,
    /// Four-digit year or `"N/A"`.
    pub year: String,
    /// One decimal on a 0-10 scale or `"N/A"`.
    pub rating: String,
    /// Up to two genre names joined by `" / "`; may be empty.
    pub genre_label: String,
    /// Absolute URL, empty when the entity has no artwork.
    pub image_url: String,
}

/// A mapped page of list results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPage {
    pub items: Vec<CardViewModel>,
    pub total_pages: u32,
}

/// What a list page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState {
    pub items: Vec<CardViewModel>,
    pub page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub last_error: Option<ErrorKind>,
    pub phase: Phase,
}

impl Default for ListViewState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            is_loading: false,
            last_error: None,
            phase: Phase::Idle,
        }
    }
}

impl ListViewState {
    /// No fetch is pending or running.
    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, Phase::Debouncing | Phase::Fetching)
    }

    /// Nothing to show and the last attempt failed.
    pub fn is_not_found(&self) -> bool {
        self.items.is_empty() && self.last_error.is_some() && !self.is_loading
    }
}

/// Full single-title record for detail pages and the featured hero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailViewModel {
    pub link: CardLink,
    pub kind: MediaKind,
    pub title: String,
    /// Empty when the catalog has none.
    pub tagline: String,
    pub overview: String,
    pub year: String,
    pub rating: String,
    /// `"{n} min"` for movies, `"{n} seasons"` for series, `"{n} eps"` for anime.
    pub runtime: String,
    /// Per-episode length, anime only.
    pub episode_length: Option<String>,
    pub status: String,
    pub language: String,
    pub genres: Vec<String>,
    /// Video-host key; empty when there is no trailer.
    pub trailer_key: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub gallery: Vec<String>,
    pub similar: Vec<CardViewModel>,
}

impl DetailViewModel {
    /// Genre names as one line, `"Drama · Crime"`.
    pub fn genre_line(&self) -> String {
        self.genres.join(" · ")
    }

    /// Tagline, or the overview when the title has no tagline.
    pub fn headline(&self) -> &str {
        if self.tagline.is_empty() {
            &self.overview
        } else {
            &self.tagline
        }
    }
}

/// The rotating hero on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeaturedState {
    pub pool: Vec<super::FeaturedCandidate>,
    pub active_index: usize,
    pub details: Option<DetailViewModel>,
    pub trailer_key: String,
}

/// Upcoming-release row on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEntry {
    pub title: String,
    pub note: String,
    /// `"Mar 05, 2026"` or `"TBA"`.
    pub date: String,
}

/// Now-playing row on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuratedEntry {
    pub title: String,
    pub tag: String,
}
