//! Plain-text rendering of session snapshots.

use std::fmt::Write;

use peepers_core::mapper::trailer_embed_url;
use peepers_core::models::{CardViewModel, DetailViewModel, GenreOption};
use peepers_runtime::{DetailState, HomeState, ListPageState, QuickSearchState};

const NOT_FOUND: &str = "Not found.";

fn card_line(out: &mut String, card: &CardViewModel) {
    let _ = write!(out, "  {} ({}) ★ {}", card.title, card.year, card.rating);
    if !card.genre_label.is_empty() {
        let _ = write!(out, "  [{}]", card.genre_label);
    }
    if let Some(route) = card.link.route() {
        let _ = write!(out, "  {route}");
    }
    out.push('\n');
}

pub fn list(state: &ListPageState) -> String {
    let mut out = String::new();
    let view = &state.view;

    let _ = write!(out, "Genre: {}", state.genre_label());
    if !state.search_text.is_empty() {
        let _ = write!(out, "  Search: {:?}", state.search_text);
    }
    out.push('\n');

    if view.is_not_found() {
        out.push_str(NOT_FOUND);
        out.push('\n');
        return out;
    }
    if let Some(kind) = view.last_error {
        let _ = writeln!(out, "({kind} error, showing the last results)");
    }
    for card in &view.items {
        card_line(&mut out, card);
    }
    let _ = writeln!(out, "Page {} of {}", view.page, view.total_pages);
    out
}

/// Genre menu entries, one per line.
pub fn genre_menu(genres: &[GenreOption]) -> String {
    genres
        .iter()
        .map(|g| format!("  {:>8}  {}\n", g.id.to_string(), g.name))
        .collect()
}

pub fn home(state: &HomeState) -> String {
    let mut out = String::new();

    if let Some(featured) = &state.featured.details {
        let _ = writeln!(out, "Featured: {}", featured.title);
        if !featured.headline().is_empty() {
            let _ = writeln!(out, "  {}", featured.headline());
        }
        let trailer = trailer_embed_url(&state.featured.trailer_key);
        if !trailer.is_empty() {
            let _ = writeln!(out, "  Trailer: {trailer}");
        }
        out.push('\n');
    }

    if state.trending.is_empty() && state.last_error.is_some() {
        out.push_str(NOT_FOUND);
        out.push('\n');
        return out;
    }

    out.push_str("Trending\n");
    for card in &state.trending {
        card_line(&mut out, card);
    }

    out.push_str("\nUpcoming\n");
    for entry in &state.upcoming {
        let _ = writeln!(out, "  {}  {}  {}", entry.date, entry.title, entry.note);
    }

    out.push_str("\nNow playing\n");
    for entry in &state.curated {
        let _ = writeln!(out, "  {}  [{}]", entry.title, entry.tag);
    }
    out
}

fn detail_body(out: &mut String, d: &DetailViewModel) {
    let _ = writeln!(out, "{} ({})", d.title, d.year);
    if !d.tagline.is_empty() {
        let _ = writeln!(out, "  {}", d.tagline);
    }
    let _ = writeln!(out, "  Rating: {}  Runtime: {}", d.rating, d.runtime);
    if let Some(length) = &d.episode_length {
        let _ = writeln!(out, "  Episode length: {length}");
    }
    let _ = writeln!(out, "  Status: {}  Language: {}", d.status, d.language);
    if !d.genres.is_empty() {
        let _ = writeln!(out, "  Genres: {}", d.genre_line());
    }
    if !d.overview.is_empty() {
        let _ = writeln!(out, "\n{}", d.overview);
    }

    let trailer = trailer_embed_url(&d.trailer_key);
    if !trailer.is_empty() {
        let _ = writeln!(out, "\nTrailer: {trailer}");
    }
    if !d.gallery.is_empty() {
        out.push_str("\nGallery\n");
        for (i, src) in d.gallery.iter().enumerate() {
            let _ = writeln!(out, "  {i}: {src}");
        }
    }
    if !d.similar.is_empty() {
        out.push_str("\nSimilar\n");
        for card in &d.similar {
            card_line(out, card);
        }
    }
}

pub fn detail(state: &DetailState) -> String {
    let mut out = String::new();
    match &state.detail {
        Some(d) => detail_body(&mut out, d),
        None => {
            out.push_str(NOT_FOUND);
            out.push('\n');
        }
    }
    out
}

pub fn quick_search(state: &QuickSearchState) -> String {
    let mut out = String::new();
    if let Some(kind) = state.last_error {
        let _ = writeln!(out, "({kind} error)");
    }
    if state.results.is_empty() {
        out.push_str("No matches.\n");
    }
    for card in &state.results {
        card_line(&mut out, card);
    }
    out
}
