mod cli;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;
use peepers_api::anilist::AniListClient;
use peepers_api::tmdb::TmdbClient;
use peepers_core::config::AppConfig;
use peepers_core::error::PeepersError;
use peepers_core::models::{FilterId, MediaKind};
use peepers_core::theme::{self, FilePreferences, ThemeStore};
use peepers_runtime::{ListHandle, ListOptions, Runtime};
use tokio::io::{AsyncBufReadExt, BufReader};

use cli::{Cli, Command, PageAction, ThemeAction};

type App = Runtime<TmdbClient, AniListClient>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("peepers: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = config.logging.file.then(AppConfig::log_dir);
    let _guard = logging::init(cli.verbose, log_dir.as_deref());

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<(), PeepersError> {
    let store = ThemeStore::init(
        FilePreferences::default_location(),
        config.appearance.default_theme,
    );
    let store = theme::install(store)?;

    if let Command::Theme { action } = command {
        match action.unwrap_or(ThemeAction::Get) {
            ThemeAction::Get => println!("{}", store.get()),
            ThemeAction::Set { theme } => {
                store.set(theme)?;
                println!("{theme}");
            }
            ThemeAction::Toggle => println!("{}", store.toggle()?),
        }
        return Ok(());
    }

    let app = Runtime::from_config(config);
    tracing::debug!(theme = %store.get(), "starting");

    match command {
        Command::Home => {
            let mut home = app.open_home();
            print!("{}", render::home(&home.ready().await));
            home.dispose();
        }
        Command::Movies(args) => {
            let options = list_options(args.search, args.genre);
            list_page(&app, MediaKind::Movie, options, args.interactive).await?;
        }
        Command::Series(args) => {
            let options = list_options(args.search, args.genre);
            list_page(&app, MediaKind::Series, options, args.interactive).await?;
        }
        Command::Anime(args) => {
            let options = list_options(args.search, None);
            list_page(&app, MediaKind::Anime, options, args.interactive).await?;
        }
        Command::Genre { id } => {
            let mut list = app.open_genre(id);
            print!("{}", render::list(&list.ready().await));
            list.dispose();
        }
        Command::Movie { id } => detail(&app, MediaKind::Movie, id).await,
        Command::Show { id } => detail(&app, MediaKind::Series, id).await,
        Command::AnimeDetail { id } => detail(&app, MediaKind::Anime, id).await,
        Command::Search { text } => {
            let mut search = app.open_quick_search();
            search.set_search_text(text);
            print!("{}", render::quick_search(&search.settled().await));
            search.dispose();
        }
        Command::Theme { .. } => {}
    }
    Ok(())
}

fn list_options(search: Option<String>, filter: Option<FilterId>) -> ListOptions {
    ListOptions {
        search_text: search.unwrap_or_default(),
        filter,
        locked: false,
    }
}

async fn detail(app: &App, kind: MediaKind, id: u64) {
    let mut detail = app.open_detail(kind, id);
    print!("{}", render::detail(&detail.settled().await));
    detail.dispose();
}

async fn list_page(
    app: &App,
    kind: MediaKind,
    options: ListOptions,
    interactive: bool,
) -> Result<(), PeepersError> {
    let mut list = app.open_list(kind, options);
    let state = list.ready().await;
    print!("{}", render::list(&state));

    if interactive {
        print!("{}", render::genre_menu(&state.genres));
        interact(&mut list).await?;
    }

    list.dispose();
    Ok(())
}

/// Read page actions from stdin until `/quit` or end of input.
async fn interact(list: &mut ListHandle) -> Result<(), PeepersError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match PageAction::parse(&line) {
            PageAction::Quit => break,
            PageAction::Next => list.go_to_next(),
            PageAction::Previous => list.go_to_previous(),
            PageAction::Genre(filter) => list.set_filter(Some(filter)),
            PageAction::ClearGenre => list.set_filter(None),
            PageAction::Search(text) => list.set_search_text(text),
        }
        print!("{}", render::list(&list.settled().await));
    }
    Ok(())
}
