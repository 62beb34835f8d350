use std::sync::Arc;
use std::time::Duration;

use peepers_api::traits::{AnimeCatalog, FilmCatalog};
use peepers_core::error::{ErrorKind, FetchError};
use peepers_core::models::CardViewModel;
use peepers_core::overlay::Dismissible;
use peepers_core::query::{Effect, Epoch, Phase, QueryController};
use tokio::sync::mpsc;

use super::{Publisher, Watcher};
use crate::catalog::Catalog;
use crate::driver;

const DROPDOWN_SCOPE: &str = "header-search";

/// Header search box with its results dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuickSearchState {
    pub query: String,
    pub results: Vec<CardViewModel>,
    pub is_loading: bool,
    pub last_error: Option<ErrorKind>,
    pub phase: Phase,
    pub is_open: bool,
}

impl QuickSearchState {
    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, Phase::Debouncing | Phase::Fetching)
    }
}

enum Command {
    SetText(String),
    Click(Vec<String>),
    Close,
    Dispose,
}

enum Event {
    Elapsed(Epoch),
    Settled(Epoch, Result<Vec<CardViewModel>, FetchError>),
}

pub struct QuickSearchHandle {
    tx: mpsc::UnboundedSender<Command>,
    state: Watcher<QuickSearchState>,
}

impl QuickSearchHandle {
    fn send(&mut self, command: Command) {
        self.state.sent();
        let _ = self.tx.send(command);
    }

    pub fn snapshot(&self) -> QuickSearchState {
        self.state.snapshot()
    }

    pub async fn changed(&mut self) -> bool {
        self.state.changed().await
    }

    pub async fn settled(&mut self) -> QuickSearchState {
        self.state.wait_until(QuickSearchState::is_settled).await
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.send(Command::SetText(text.into()));
    }

    pub fn click(&mut self, path: Vec<String>) {
        self.send(Command::Click(path));
    }

    pub fn close(&mut self) {
        self.send(Command::Close);
    }

    pub fn dispose(self) {
        let _ = self.tx.send(Command::Dispose);
    }
}

struct QuickSearchSession<F, A> {
    catalog: Arc<Catalog<F, A>>,
    debounce: Duration,
    text: String,
    query: QueryController<String, Vec<CardViewModel>>,
    dropdown: Dismissible,
    events: mpsc::UnboundedSender<Event>,
    state: Publisher<QuickSearchState>,
}

pub(crate) fn spawn<F: FilmCatalog, A: AnimeCatalog>(
    catalog: Arc<Catalog<F, A>>,
    debounce: Duration,
) -> QuickSearchHandle {
    let (tx, commands) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = super::channel(QuickSearchState::default());

    let session = QuickSearchSession {
        catalog,
        debounce,
        text: String::new(),
        query: QueryController::new(),
        dropdown: Dismissible::new(DROPDOWN_SCOPE),
        events: events_tx,
        state: state_tx,
    };
    tokio::spawn(session.run(commands, events));

    QuickSearchHandle {
        tx,
        state: state_rx,
    }
}

impl<F: FilmCatalog, A: AnimeCatalog> QuickSearchSession<F, A> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Dispose) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(event) = events.recv() => match event {
                    Event::Elapsed(epoch) => {
                        let effect = self.query.debounce_elapsed(epoch);
                        self.schedule(effect);
                    }
                    Event::Settled(epoch, result) => {
                        self.query.settle(epoch, result);
                    }
                },
            }
            self.publish();
        }

        self.query.dispose();
        tracing::debug!("quick search session closed");
    }

    fn handle(&mut self, command: Command) {
        self.state.handled();
        match command {
            Command::SetText(text) => {
                self.text = text;
                let trimmed = self.text.trim();
                if trimmed.is_empty() {
                    // Clearing the box drops results without a request.
                    self.query.invalidate();
                    self.query.clear_value();
                    self.dropdown.close();
                } else {
                    let effect = self.query.set_key(trimmed.to_string(), self.debounce);
                    self.dropdown.open();
                    self.schedule(effect);
                }
            }
            Command::Click(path) => {
                self.dropdown.handle_click(&path);
            }
            Command::Close => self.dropdown.close(),
            Command::Dispose => {}
        }
    }

    fn schedule(&self, effect: Effect<String>) {
        let catalog = Arc::clone(&self.catalog);
        driver::perform(effect, &self.events, Event::Elapsed, move |epoch, text| async move {
            Event::Settled(epoch, catalog.quick_search(&text).await)
        });
    }

    fn publish(&self) {
        self.state.publish(QuickSearchState {
            query: self.text.clone(),
            results: self.query.value().cloned().unwrap_or_default(),
            is_loading: self.query.is_loading(),
            last_error: self.query.last_error(),
            phase: self.query.phase(),
            is_open: self.dropdown.is_open(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_returns_top_six() {
        let fake = FakeCatalog::new();
        let mut search = fake.runtime().open_quick_search();

        search.set_search_text("al");
        search.set_search_text("alien");
        let state = search.settled().await;

        assert_eq!(fake.calls(), vec!["search:movie:alien:1"]);
        assert_eq!(state.results.len(), 6);
        assert!(state.is_open);
        assert_eq!(state.query, "alien");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_closes_without_fetch() {
        let fake = FakeCatalog::new();
        let mut search = fake.runtime().open_quick_search();

        search.set_search_text("alien");
        search.settled().await;

        search.set_search_text("   ");
        let state = search.settled().await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(state.results.is_empty());
        assert!(!state.is_open);
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_cancels_pending_search() {
        let fake = FakeCatalog::new();
        let mut search = fake.runtime().open_quick_search();

        search.set_search_text("alien");
        search.set_search_text("");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(fake.calls().is_empty());
        assert_eq!(search.settled().await.phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_results() {
        let fake = FakeCatalog::new();
        let mut search = fake.runtime().open_quick_search();

        search.set_search_text("alien");
        search.settled().await;

        fake.fail("search:movie:aliens");
        search.set_search_text("aliens");
        let state = search.settled().await;

        assert_eq!(state.last_error, Some(ErrorKind::Network));
        assert_eq!(state.results.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_outside_closes_dropdown() {
        let fake = FakeCatalog::new();
        let mut search = fake.runtime().open_quick_search();
        search.set_search_text("alien");
        search.settled().await;

        search.click(vec!["result".into(), DROPDOWN_SCOPE.into()]);
        assert!(search.settled().await.is_open);

        search.click(vec!["body".into()]);
        assert!(!search.settled().await.is_open);
    }
}
