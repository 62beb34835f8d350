use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use peepers_core::models::FilterId;
use peepers_core::theme::Theme;

/// Browse movies, series and anime from TMDB and AniList.
#[derive(Parser, Debug)]
#[command(name = "peepers", version)]
pub struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Trending titles, the featured pick, upcoming and now playing
    Home,
    /// Popular movies, a search, or one genre
    Movies(ListArgs),
    /// Popular series, a search, or one genre (`kdrama` for Korean dramas)
    Series(ListArgs),
    /// Popular anime or an anime search
    Anime(AnimeArgs),
    /// Movies in one genre
    Genre { id: u64 },
    /// Movie details
    Movie { id: u64 },
    /// Series details
    Show { id: u64 },
    /// Anime details
    AnimeDetail { id: u64 },
    /// Quick movie search (top matches only)
    Search { text: String },
    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(short, long)]
    pub search: Option<String>,

    /// Genre id, or a named tag such as `kdrama`
    #[arg(short, long)]
    pub genre: Option<FilterId>,

    /// Keep the page open and read actions from stdin
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Args, Debug)]
pub struct AnimeArgs {
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ThemeAction {
    Get,
    Set { theme: Theme },
    Toggle,
}

/// One line typed on an interactive list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Next,
    Previous,
    Genre(FilterId),
    ClearGenre,
    Quit,
    Search(String),
}

impl PageAction {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            ("/next", _) => Self::Next,
            ("/prev", _) => Self::Previous,
            ("/genre", id) if !id.trim().is_empty() => match id.parse() {
                Ok(filter) => Self::Genre(filter),
                Err(never) => match never {},
            },
            ("/clear-genre", _) => Self::ClearGenre,
            ("/quit", _) => Self::Quit,
            _ => Self::Search(line.to_string()),
        }
    }
}
