//! Raw catalog payloads → display-ready view models.
//!
//! Every function here is pure and total: missing fields degrade to `"N/A"`,
//! an empty string or an empty list, never to an error.

use std::sync::LazyLock;

use chrono::NaiveDate;
use peepers_api::anilist::types::{AniListMedia, AniListTrailer};
use peepers_api::image::{image_url, SIZE_BACKDROP, SIZE_POSTER, SIZE_POSTER_SMALL};
use peepers_api::tmdb::types::{ImagesResponse, TmdbDetails, TmdbMedia, TmdbVideo, VideosResponse};
use regex::Regex;

use crate::featured::FeaturedDetail;
use crate::models::{
    CardLink, CardViewModel, CuratedEntry, DetailViewModel, FeaturedCandidate, GenreMap,
    MediaKind, UpcomingEntry,
};

pub const NOT_AVAILABLE: &str = "N/A";

/// Cards shown per list page.
pub const LIST_PAGE_SIZE: usize = 8;

const FEATURE_LABEL: &str = "Feature";
const NOW_PLAYING_TAG: &str = "Now playing";
const UPCOMING_NOTE: &str = "Upcoming release";
const NO_OVERVIEW: &str = "No overview available.";
const GALLERY_LIMIT: usize = 6;
const SIMILAR_LIMIT: usize = 8;

const TRAILER_EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed";

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// ── Field helpers ────────────────────────────────────────────────

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// One decimal on the catalog's 0-10 scale.
fn tmdb_rating(vote_average: Option<f64>) -> String {
    or_na(vote_average.map(|v| format!("{v:.1}")))
}

/// AniList scores are 0-100; zero means unscored.
fn anime_rating(average_score: Option<u32>) -> String {
    or_na(
        average_score
            .filter(|&s| s > 0)
            .map(|s| format!("{:.1}", f64::from(s) / 10.0)),
    )
}

/// First four characters of an ISO date.
fn year_of(date: Option<&str>) -> String {
    or_na(date.map(|d| d.chars().take(4).collect()))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Resolve up to two genre ids, skipping ids the map doesn't know.
pub fn genre_label(ids: &[u64], genres: &GenreMap) -> String {
    ids.iter()
        .filter_map(|id| genres.get(id))
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" / ")
}

fn tmdb_card(kind: MediaKind, media: &TmdbMedia, size: &str, genre_label: String) -> CardViewModel {
    CardViewModel {
        link: CardLink::Linked { kind, id: media.id },
        title: media.display_title().to_string(),
        year: year_of(media.date()),
        rating: tmdb_rating(media.vote_average),
        genre_label,
        image_url: image_url(media.poster_path.as_deref(), size),
    }
}

// ── Cards ────────────────────────────────────────────────────────

pub fn movie_card(media: &TmdbMedia) -> CardViewModel {
    tmdb_card(MediaKind::Movie, media, SIZE_POSTER, String::new())
}

pub fn series_card(media: &TmdbMedia) -> CardViewModel {
    tmdb_card(MediaKind::Series, media, SIZE_POSTER, String::new())
}

/// Trending card on the home page, labelled with its genres.
pub fn home_card(media: &TmdbMedia, genres: &GenreMap) -> CardViewModel {
    let mut label = genre_label(&media.genre_ids, genres);
    if label.is_empty() {
        label = FEATURE_LABEL.to_string();
    }
    tmdb_card(MediaKind::Movie, media, SIZE_POSTER, label)
}

pub fn anime_card(media: &AniListMedia) -> CardViewModel {
    let genre_label = media
        .genres
        .as_deref()
        .map(|g| g.iter().take(2).map(String::as_str).collect::<Vec<_>>().join(" / "))
        .unwrap_or_default();

    CardViewModel {
        link: CardLink::Linked {
            kind: MediaKind::Anime,
            id: media.id,
        },
        title: media.preferred_title().unwrap_or("Untitled").to_string(),
        year: or_na(media.start_year().map(|y| y.to_string())),
        rating: anime_rating(media.average_score),
        genre_label,
        image_url: media.cover_url().unwrap_or_default().to_string(),
    }
}

/// "More like this" strip: small posters, at most eight.
pub fn similar_cards(kind: MediaKind, results: &[TmdbMedia]) -> Vec<CardViewModel> {
    results
        .iter()
        .take(SIMILAR_LIMIT)
        .map(|m| tmdb_card(kind, m, SIZE_POSTER_SMALL, String::new()))
        .collect()
}

// ── Detail ───────────────────────────────────────────────────────

/// Backdrops that have a path, at most six.
pub fn gallery(images: &ImagesResponse) -> Vec<String> {
    images
        .backdrops
        .iter()
        .filter_map(|img| non_empty(img.file_path.as_deref()))
        .take(GALLERY_LIMIT)
        .map(|path| image_url(Some(path), SIZE_BACKDROP))
        .collect()
}

/// Map a TMDB title record. Gallery, similar and trailer are left empty.
pub fn tmdb_detail(kind: MediaKind, details: &TmdbDetails) -> DetailViewModel {
    let runtime = match kind {
        MediaKind::Series => details.number_of_seasons.map(|n| format!("{n} seasons")),
        _ => details.runtime.map(|n| format!("{n} min")),
    };

    DetailViewModel {
        link: CardLink::Linked {
            kind,
            id: details.id,
        },
        kind,
        title: details.display_title().to_string(),
        tagline: details.tagline.clone().unwrap_or_default(),
        overview: non_empty(details.overview.as_deref())
            .unwrap_or(NO_OVERVIEW)
            .to_string(),
        year: year_of(details.date()),
        rating: tmdb_rating(details.vote_average),
        runtime: or_na(runtime),
        episode_length: None,
        status: or_na(details.status.clone()),
        language: or_na(
            non_empty(details.original_language.as_deref()).map(str::to_uppercase),
        ),
        genres: details.genres.iter().map(|g| g.name.clone()).collect(),
        trailer_key: String::new(),
        poster_url: image_url(details.poster_path.as_deref(), SIZE_POSTER),
        backdrop_url: image_url(details.backdrop_path.as_deref(), SIZE_BACKDROP),
        gallery: Vec::new(),
        similar: Vec::new(),
    }
}

pub fn movie_detail(details: &TmdbDetails) -> DetailViewModel {
    tmdb_detail(MediaKind::Movie, details)
}

pub fn series_detail(details: &TmdbDetails) -> DetailViewModel {
    tmdb_detail(MediaKind::Series, details)
}

/// Merge the four detail-page payloads into one record.
pub fn media_detail(
    kind: MediaKind,
    details: &TmdbDetails,
    images: &ImagesResponse,
    similar: &[TmdbMedia],
    videos: &VideosResponse,
) -> DetailViewModel {
    DetailViewModel {
        gallery: gallery(images),
        similar: similar_cards(kind, similar),
        trailer_key: pick_trailer(&videos.results),
        ..tmdb_detail(kind, details)
    }
}

pub fn anime_detail(media: &AniListMedia) -> DetailViewModel {
    let overview = clean_description(media.description.as_deref().unwrap_or_default());

    DetailViewModel {
        link: CardLink::Linked {
            kind: MediaKind::Anime,
            id: media.id,
        },
        kind: MediaKind::Anime,
        title: media.preferred_title().unwrap_or("Anime").to_string(),
        tagline: String::new(),
        overview: if overview.is_empty() {
            NO_OVERVIEW.to_string()
        } else {
            overview
        },
        year: or_na(media.start_year().map(|y| y.to_string())),
        rating: anime_rating(media.average_score),
        runtime: or_na(media.episodes.filter(|&n| n > 0).map(|n| format!("{n} eps"))),
        episode_length: Some(or_na(
            media.duration.filter(|&n| n > 0).map(|n| format!("{n} min")),
        )),
        status: or_na(media.status.clone()),
        language: NOT_AVAILABLE.to_string(),
        genres: media.genres.clone().unwrap_or_default(),
        trailer_key: media.trailer.as_ref().map(anime_trailer).unwrap_or_default(),
        poster_url: media.cover_url().unwrap_or_default().to_string(),
        backdrop_url: non_empty(media.banner_image.as_deref())
            .unwrap_or_default()
            .to_string(),
        gallery: Vec::new(),
        similar: Vec::new(),
    }
}

/// Strip HTML tags and collapse runs of whitespace.
pub fn clean_description(text: &str) -> String {
    let stripped = HTML_TAG_RE.replace_all(text, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

// ── Trailers ─────────────────────────────────────────────────────

/// Pick a YouTube key, preferring an entry typed `Trailer`.
pub fn pick_trailer(videos: &[TmdbVideo]) -> String {
    let youtube: Vec<&TmdbVideo> = videos
        .iter()
        .filter(|v| v.site.as_deref() == Some("YouTube"))
        .filter(|v| non_empty(v.key.as_deref()).is_some())
        .collect();

    youtube
        .iter()
        .find(|v| v.video_type.as_deref() == Some("Trailer"))
        .or(youtube.first())
        .and_then(|v| v.key.clone())
        .unwrap_or_default()
}

/// AniList trailer id when it is hosted on YouTube.
pub fn anime_trailer(trailer: &AniListTrailer) -> String {
    match (non_empty(trailer.id.as_deref()), trailer.site.as_deref()) {
        (Some(id), Some(site)) if site.eq_ignore_ascii_case("youtube") => id.to_string(),
        _ => String::new(),
    }
}

pub fn trailer_embed_url(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        format!("{TRAILER_EMBED_BASE}/{key}")
    }
}

// ── Home page ────────────────────────────────────────────────────

/// `"2026-03-05"` → `"Mar 05, 2026"`; missing or unparseable → `"TBA"`.
pub fn format_release_date(date: Option<&str>) -> String {
    non_empty(date)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "TBA".to_string())
}

pub fn upcoming_entry(media: &TmdbMedia) -> UpcomingEntry {
    UpcomingEntry {
        title: media.display_title().to_string(),
        note: UPCOMING_NOTE.to_string(),
        date: format_release_date(media.date()),
    }
}

/// Now-playing row tagged with its first genre.
pub fn curated_entry(media: &TmdbMedia, genres: &GenreMap) -> CuratedEntry {
    let tag = media
        .genre_ids
        .first()
        .and_then(|id| genres.get(id))
        .cloned()
        .unwrap_or_else(|| NOW_PLAYING_TAG.to_string());
    CuratedEntry {
        title: media.display_title().to_string(),
        tag,
    }
}

pub fn featured_candidate(media: &TmdbMedia) -> FeaturedCandidate {
    FeaturedCandidate {
        id: media.id,
        kind: MediaKind::Movie,
        title: media.display_title().to_string(),
    }
}

pub fn featured_detail(details: &TmdbDetails, videos: &VideosResponse) -> FeaturedDetail {
    FeaturedDetail {
        detail: movie_detail(details),
        trailer_key: pick_trailer(&videos.results),
    }
}
