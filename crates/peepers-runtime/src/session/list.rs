use std::sync::Arc;
use std::time::Duration;

use peepers_api::traits::{AnimeCatalog, FilmCatalog};
use peepers_core::error::FetchError;
use peepers_core::models::{CardPage, FilterId, GenreOption, ListViewState, MediaKind, QueryKey};
use peepers_core::overlay::Dismissible;
use peepers_core::pagination::ListController;
use peepers_core::query::{Effect, Epoch};
use tokio::sync::mpsc;

use super::{Publisher, Watcher};
use crate::catalog::Catalog;
use crate::driver;

const GENRE_PLACEHOLDER: &str = "Genre";
const MENU_SCOPE: &str = "genre-menu";

/// Starting point for a list page.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search_text: String,
    pub filter: Option<FilterId>,
    /// Search and filter actions are ignored (genre pages).
    pub locked: bool,
}

/// What a list page renders, including its genre menu.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPageState {
    pub view: ListViewState,
    pub search_text: String,
    pub filter: Option<FilterId>,
    pub genres: Vec<GenreOption>,
    /// The genre menu request has finished (or the page has no menu).
    pub menu_loaded: bool,
    pub menu_open: bool,
}

impl ListPageState {
    /// Name of the selected genre, or `"Genre"` when none is selected or
    /// the menu hasn't loaded.
    pub fn genre_label(&self) -> &str {
        self.filter
            .as_ref()
            .and_then(|f| self.genres.iter().find(|g| &g.id == f))
            .map(|g| g.name.as_str())
            .unwrap_or(GENRE_PLACEHOLDER)
    }
}

#[derive(Debug)]
enum Command {
    SetSearchText(String),
    SetFilter(Option<FilterId>),
    Previous,
    Next,
    ToggleMenu,
    Click(Vec<String>),
    Dispose,
}

enum Event {
    Elapsed(Epoch),
    Settled(Epoch, Result<CardPage, FetchError>),
    Genres(Result<Vec<GenreOption>, FetchError>),
}

pub struct ListHandle {
    tx: mpsc::UnboundedSender<Command>,
    state: Watcher<ListPageState>,
}

impl ListHandle {
    fn send(&mut self, command: Command) {
        self.state.sent();
        let _ = self.tx.send(command);
    }

    pub fn snapshot(&self) -> ListPageState {
        self.state.snapshot()
    }

    /// Wait for the next published state. `false` once the session has ended.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await
    }

    /// Wait until nothing is debouncing or fetching.
    pub async fn settled(&mut self) -> ListPageState {
        self.state.wait_until(|s| s.view.is_settled()).await
    }

    /// Like [`settled`](Self::settled), but also waits for the genre menu.
    pub async fn ready(&mut self) -> ListPageState {
        self.state
            .wait_until(|s| s.view.is_settled() && s.menu_loaded)
            .await
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.send(Command::SetSearchText(text.into()));
    }

    pub fn set_filter(&mut self, filter: Option<FilterId>) {
        self.send(Command::SetFilter(filter));
    }

    pub fn go_to_previous(&mut self) {
        self.send(Command::Previous);
    }

    pub fn go_to_next(&mut self) {
        self.send(Command::Next);
    }

    pub fn toggle_genre_menu(&mut self) {
        self.send(Command::ToggleMenu);
    }

    /// Route a click; `path` lists scope ids from the target to the root.
    pub fn click(&mut self, path: Vec<String>) {
        self.send(Command::Click(path));
    }

    pub fn dispose(self) {
        let _ = self.tx.send(Command::Dispose);
    }
}

struct ListSession<F, A> {
    catalog: Arc<Catalog<F, A>>,
    controller: ListController,
    locked: bool,
    genres: Vec<GenreOption>,
    menu_loaded: bool,
    menu: Dismissible,
    events: mpsc::UnboundedSender<Event>,
    state: Publisher<ListPageState>,
}

pub(crate) fn spawn<F: FilmCatalog, A: AnimeCatalog>(
    catalog: Arc<Catalog<F, A>>,
    kind: MediaKind,
    debounce: Duration,
    options: ListOptions,
) -> ListHandle {
    let mut controller = ListController::new(kind, debounce)
        .with_search_text(&options.search_text)
        .with_filter(options.filter);
    let initial = controller.start();

    let (tx, commands) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = super::channel(ListPageState::default());

    let session = ListSession {
        catalog,
        controller,
        locked: options.locked,
        genres: Vec::new(),
        menu_loaded: kind.tmdb().is_none(),
        menu: Dismissible::new(MENU_SCOPE),
        events: events_tx,
        state: state_tx,
    };
    session.publish();

    tracing::info!(%kind, "list session started");
    tokio::spawn(session.run(initial, commands, events));

    ListHandle {
        tx,
        state: state_rx,
    }
}

impl<F: FilmCatalog, A: AnimeCatalog> ListSession<F, A> {
    async fn run(
        mut self,
        initial: Effect<QueryKey>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        self.schedule(initial);
        self.load_genres();

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    if matches!(command, Command::Dispose) {
                        break;
                    }
                    let effect = self.handle(command);
                    self.schedule(effect);
                }
                Some(event) = events.recv() => self.on_event(event),
            }
            self.publish();
        }

        self.controller.dispose();
        tracing::debug!(kind = %self.controller.kind(), "list session closed");
    }

    fn handle(&mut self, command: Command) -> Effect<QueryKey> {
        self.state.handled();
        match command {
            Command::SetSearchText(_) | Command::SetFilter(_) | Command::ToggleMenu
                if self.locked =>
            {
                tracing::debug!(?command, "ignored on a locked list");
                Effect::None
            }
            Command::SetSearchText(text) => self.controller.set_search_text(&text),
            Command::SetFilter(filter) => {
                self.menu.close();
                self.controller.set_filter(filter)
            }
            Command::Previous => self.controller.go_to_previous(),
            Command::Next => self.controller.go_to_next(),
            Command::ToggleMenu => {
                self.menu.toggle();
                Effect::None
            }
            Command::Click(path) => {
                self.menu.handle_click(&path);
                Effect::None
            }
            Command::Dispose => Effect::None,
        }
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Elapsed(epoch) => {
                let effect = self.controller.debounce_elapsed(epoch);
                self.schedule(effect);
            }
            Event::Settled(epoch, result) => {
                self.controller.settle(epoch, result);
            }
            Event::Genres(result) => {
                self.menu_loaded = true;
                match result {
                    Ok(genres) => self.genres = genres,
                    Err(e) => tracing::warn!(error = %e, "genre menu unavailable"),
                }
            }
        }
    }

    fn schedule(&self, effect: Effect<QueryKey>) {
        let catalog = Arc::clone(&self.catalog);
        driver::perform(effect, &self.events, Event::Elapsed, move |epoch, key| async move {
            Event::Settled(epoch, catalog.list_page(&key).await)
        });
    }

    /// The genre menu loads once, alongside the first page.
    fn load_genres(&self) {
        let kind = self.controller.kind();
        if kind.tmdb().is_none() {
            return;
        }
        let catalog = Arc::clone(&self.catalog);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let _ = tx.send(Event::Genres(catalog.genre_options(kind).await));
        });
    }

    fn publish(&self) {
        self.state.publish(ListPageState {
            view: self.controller.snapshot(),
            search_text: self.controller.search_text().to_string(),
            filter: self.controller.filter().cloned(),
            genres: self.genres.clone(),
            menu_loaded: self.menu_loaded,
            menu_open: self.menu.is_open(),
        });
    }
}
