//! Image URL templating for TMDB relative image paths.

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Small poster, used for "similar titles" strips.
pub const SIZE_POSTER_SMALL: &str = "w342";
/// Card poster.
pub const SIZE_POSTER: &str = "w780";
/// Backdrops and stills.
pub const SIZE_BACKDROP: &str = "w1280";

/// Build an absolute image URL from a relative path and a size token.
///
/// Returns an empty string when there is no path; the presentation layer
/// substitutes its own placeholder.
pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{IMAGE_BASE_URL}/{size}{p}"),
        _ => String::new(),
    }
}
