use std::sync::Arc;
use std::time::Duration;

use peepers_api::traits::{AnimeCatalog, FilmCatalog};
use peepers_core::error::{ErrorKind, FetchError};
use peepers_core::models::{DetailViewModel, MediaKind};
use peepers_core::overlay::ImageViewer;
use peepers_core::query::{Effect, Epoch, Phase, QueryController};
use tokio::sync::mpsc;

use super::{Publisher, Watcher};
use crate::catalog::Catalog;
use crate::driver;

const LIGHTBOX_SCOPE: &str = "lightbox";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailState {
    pub detail: Option<DetailViewModel>,
    pub is_loading: bool,
    pub last_error: Option<ErrorKind>,
    pub phase: Phase,
    /// Gallery image shown full size.
    pub active_image: Option<String>,
}

impl DetailState {
    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, Phase::Debouncing | Phase::Fetching)
    }

    /// Nothing ever loaded and the last attempt failed.
    pub fn is_not_found(&self) -> bool {
        self.detail.is_none() && self.last_error.is_some() && !self.is_loading
    }
}

enum Command {
    Reload,
    OpenImage(usize),
    CloseImage,
    Click(Vec<String>),
    Dispose,
}

enum Event {
    Elapsed(Epoch),
    Settled(Epoch, Result<DetailViewModel, FetchError>),
}

pub struct DetailHandle {
    tx: mpsc::UnboundedSender<Command>,
    state: Watcher<DetailState>,
}

impl DetailHandle {
    fn send(&mut self, command: Command) {
        self.state.sent();
        let _ = self.tx.send(command);
    }

    pub fn snapshot(&self) -> DetailState {
        self.state.snapshot()
    }

    pub async fn changed(&mut self) -> bool {
        self.state.changed().await
    }

    pub async fn settled(&mut self) -> DetailState {
        self.state.wait_until(DetailState::is_settled).await
    }

    pub fn reload(&mut self) {
        self.send(Command::Reload);
    }

    /// Show gallery image `index` full size; out-of-range indexes are ignored.
    pub fn open_image(&mut self, index: usize) {
        self.send(Command::OpenImage(index));
    }

    pub fn close_image(&mut self) {
        self.send(Command::CloseImage);
    }

    /// Route a click; `path` lists scope ids from the target to the root.
    pub fn click(&mut self, path: Vec<String>) {
        self.send(Command::Click(path));
    }

    pub fn dispose(self) {
        let _ = self.tx.send(Command::Dispose);
    }
}

struct DetailSession<F, A> {
    catalog: Arc<Catalog<F, A>>,
    key: (MediaKind, u64),
    query: QueryController<(MediaKind, u64), DetailViewModel>,
    viewer: ImageViewer,
    events: mpsc::UnboundedSender<Event>,
    state: Publisher<DetailState>,
}

pub(crate) fn spawn<F: FilmCatalog, A: AnimeCatalog>(
    catalog: Arc<Catalog<F, A>>,
    kind: MediaKind,
    id: u64,
) -> DetailHandle {
    let key = (kind, id);
    let mut query = QueryController::new();
    let initial = query.set_key(key, Duration::ZERO);

    let (tx, commands) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = super::channel(DetailState::default());

    let session = DetailSession {
        catalog,
        key,
        query,
        viewer: ImageViewer::new(LIGHTBOX_SCOPE),
        events: events_tx,
        state: state_tx,
    };
    session.publish();

    tracing::info!(%kind, id, "detail session started");
    tokio::spawn(session.run(initial, commands, events));

    DetailHandle {
        tx,
        state: state_rx,
    }
}

impl<F: FilmCatalog, A: AnimeCatalog> DetailSession<F, A> {
    async fn run(
        mut self,
        initial: Effect<(MediaKind, u64)>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        self.schedule(initial);

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
        tracing::debug!(kind = %self.key.0, id = self.key.1, "detail session closed");
    }

    fn handle(&mut self, command: Command) {
        self.state.handled();
        match command {
            Command::Reload => {
                self.query.invalidate();
                let effect = self.query.set_key(self.key, Duration::ZERO);
                self.schedule(effect);
            }
            Command::OpenImage(index) => {
                if let Some(src) = self
                    .query
                    .value()
                    .and_then(|d| d.gallery.get(index))
                    .cloned()
                {
                    self.viewer.open(src);
                }
            }
            Command::CloseImage => self.viewer.close(),
            Command::Click(path) => {
                self.viewer.handle_click(&path);
            }
            Command::Dispose => {}
        }
    }

    fn schedule(&self, effect: Effect<(MediaKind, u64)>) {
        let catalog = Arc::clone(&self.catalog);
        driver::perform(
            effect,
            &self.events,
            Event::Elapsed,
            move |epoch, (kind, id)| async move {
                Event::Settled(epoch, catalog.detail(kind, id).await)
            },
        );
    }

    fn publish(&self) {
        self.state.publish(DetailState {
            detail: self.query.value().cloned(),
            is_loading: self.query.is_loading(),
            last_error: self.query.last_error(),
            phase: self.query.phase(),
            active_image: self.viewer.active().map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;

    #[tokio::test(start_paused = true)]
    async fn test_movie_detail_merges_four_calls() {
        let fake = FakeCatalog::new();
        let mut detail = fake.runtime().open_detail(MediaKind::Movie, 2);

        let state = detail.settled().await;
        let d = state.detail.expect("detail loaded");
        assert_eq!(d.title, "B");
        assert_eq!(d.trailer_key, "yt-2");
        assert_eq!(d.gallery.len(), 2);
        assert_eq!(d.similar.len(), 8);
        assert_eq!(d.genre_line(), "Drama");

        let mut calls = fake.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                "details:movie:2",
                "images:movie:2",
                "similar:movie:2",
                "videos:movie:2"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_failed_call_is_not_found() {
        let fake = FakeCatalog::new();
        fake.fail("similar:");
        let mut detail = fake.runtime().open_detail(MediaKind::Series, 7);

        let state = detail.settled().await;
        assert!(state.is_not_found());
        assert_eq!(state.last_error, Some(ErrorKind::Network));
    }

    #[tokio::test(start_paused = true)]
    async fn test_anime_detail_uses_anilist() {
        let fake = FakeCatalog::new();
        let mut detail = fake.runtime().open_detail(MediaKind::Anime, 42);

        let state = detail.settled().await;
        let d = state.detail.expect("detail loaded");
        assert_eq!(d.title, "Frieren");
        assert_eq!(d.overview, "An elf mage.");
        assert_eq!(fake.calls(), vec!["anime_detail:42"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lightbox_opens_and_dismisses() {
        let fake = FakeCatalog::new();
        let mut detail = fake.runtime().open_detail(MediaKind::Movie, 1);
        detail.settled().await;

        detail.open_image(9);
        assert_eq!(detail.settled().await.active_image, None);

        detail.open_image(1);
        let state = detail.settled().await;
        assert!(state.active_image.as_deref().is_some_and(|src| src.ends_with("/two.jpg")));

        detail.click(vec!["img".into(), LIGHTBOX_SCOPE.into()]);
        assert!(detail.settled().await.active_image.is_some());

        detail.click(vec!["page".into()]);
        assert_eq!(detail.settled().await.active_image, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_fetches_again() {
        let fake = FakeCatalog::new();
        let mut detail = fake.runtime().open_detail(MediaKind::Movie, 3);
        detail.settled().await;

        detail.reload();
        let state = detail.settled().await;
        assert!(state.detail.is_some());
        assert_eq!(fake.calls_with("details:"), vec!["details:movie:3", "details:movie:3"]);
    }
}
