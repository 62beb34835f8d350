use std::sync::Arc;
use std::time::Duration;

use peepers_api::traits::{AnimeCatalog, FilmCatalog};
use peepers_core::error::{ErrorKind, FetchError};
use peepers_core::featured::{FeaturedController, FeaturedDetail, FeaturedKey};
use peepers_core::models::{CardViewModel, CuratedEntry, FeaturedState, UpcomingEntry};
use peepers_core::query::{Effect, Epoch, Outcome, Phase, QueryController};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::{Publisher, Watcher};
use crate::catalog::{Catalog, HomeData};
use crate::driver;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomeState {
    pub trending: Vec<CardViewModel>,
    pub upcoming: Vec<UpcomingEntry>,
    pub curated: Vec<CuratedEntry>,
    pub featured: FeaturedState,
    /// A featured detail fetch is in flight.
    pub featured_loading: bool,
    pub is_loading: bool,
    pub last_error: Option<ErrorKind>,
    pub phase: Phase,
}

impl HomeState {
    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, Phase::Debouncing | Phase::Fetching)
    }

    /// Page data settled and the active featured entry is not loading.
    pub fn is_ready(&self) -> bool {
        self.is_settled() && !self.featured_loading
    }
}

enum Command {
    Reload,
    Dispose,
}

enum Event {
    Elapsed(Epoch),
    Loaded(Epoch, Result<HomeData, FetchError>),
    FeaturedElapsed(Epoch),
    Featured(Epoch, Result<FeaturedDetail, FetchError>),
}

pub struct HomeHandle {
    tx: mpsc::UnboundedSender<Command>,
    state: Watcher<HomeState>,
}

impl HomeHandle {
    pub fn snapshot(&self) -> HomeState {
        self.state.snapshot()
    }

    pub async fn changed(&mut self) -> bool {
        self.state.changed().await
    }

    /// Wait until the page data has loaded (or failed).
    pub async fn settled(&mut self) -> HomeState {
        self.state.wait_until(HomeState::is_settled).await
    }

    /// Wait until the page data and the first featured details are in.
    pub async fn ready(&mut self) -> HomeState {
        self.state.wait_until(HomeState::is_ready).await
    }

    /// Refetch the page data; the featured pool is replaced when it lands.
    pub fn reload(&mut self) {
        self.state.sent();
        let _ = self.tx.send(Command::Reload);
    }

    pub fn dispose(self) {
        let _ = self.tx.send(Command::Dispose);
    }
}

struct HomeSession<F, A> {
    catalog: Arc<Catalog<F, A>>,
    home: QueryController<(), HomeData>,
    featured: FeaturedController,
    rotation: Duration,
    /// Next rotation tick; `None` while the pool is empty.
    deadline: Option<Instant>,
    events: mpsc::UnboundedSender<Event>,
    state: Publisher<HomeState>,
}

pub(crate) fn spawn<F: FilmCatalog, A: AnimeCatalog>(
    catalog: Arc<Catalog<F, A>>,
    rotation: Duration,
) -> HomeHandle {
    let mut home = QueryController::new();
    let initial = home.set_key((), Duration::ZERO);

    let (tx, commands) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = super::channel(HomeState::default());

    let session = HomeSession {
        catalog,
        home,
        featured: FeaturedController::new(),
        rotation,
        deadline: None,
        events: events_tx,
        state: state_tx,
    };
    session.publish();

    tracing::info!("home session started");
    tokio::spawn(session.run(initial, commands, events));

    HomeHandle {
        tx,
        state: state_rx,
    }
}

impl<F: FilmCatalog, A: AnimeCatalog> HomeSession<F, A> {
    async fn run(
        mut self,
        initial: Effect<()>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        self.schedule_home(initial);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Reload) => {
                        self.state.handled();
                        self.home.invalidate();
                        let effect = self.home.set_key((), Duration::ZERO);
                        self.schedule_home(effect);
                    }
                    Some(Command::Dispose) | None => break,
                },
                Some(event) = events.recv() => self.on_event(event),
                () = driver::sleep_or_pending(self.deadline) => self.rotate(),
            }
            self.publish();
        }

        self.home.dispose();
        self.featured.dispose();
        tracing::debug!("home session closed");
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Elapsed(epoch) => {
                let effect = self.home.debounce_elapsed(epoch);
                self.schedule_home(effect);
            }
            Event::Loaded(epoch, result) => {
                if self.home.settle(epoch, result) == Outcome::Committed {
                    self.hand_off_pool();
                }
            }
            Event::FeaturedElapsed(epoch) => {
                let effect = self.featured.debounce_elapsed(epoch);
                self.schedule_featured(effect);
            }
            Event::Featured(epoch, result) => {
                self.featured.settle(epoch, result);
            }
        }
    }

    /// Newly loaded trending titles become the featured pool, and the
    /// rotation interval restarts.
    fn hand_off_pool(&mut self) {
        let pool = self
            .home
            .value()
            .map(|data| data.pool.clone())
            .unwrap_or_default();
        let effect = self.featured.set_pool(pool);
        self.schedule_featured(effect);
        self.restart_rotation();
    }

    fn rotate(&mut self) {
        let effect = self.featured.tick();
        self.schedule_featured(effect);
        self.restart_rotation();
    }

    /// An interval too large to represent never fires.
    fn restart_rotation(&mut self) {
        self.deadline = self
            .featured
            .is_rotating()
            .then(|| Instant::now().checked_add(self.rotation))
            .flatten();
    }

    fn schedule_home(&self, effect: Effect<()>) {
        let catalog = Arc::clone(&self.catalog);
        driver::perform(effect, &self.events, Event::Elapsed, move |epoch, ()| async move {
            Event::Loaded(epoch, catalog.home().await)
        });
    }

    fn schedule_featured(&self, effect: Effect<FeaturedKey>) {
        let catalog = Arc::clone(&self.catalog);
        driver::perform(
            effect,
            &self.events,
            Event::FeaturedElapsed,
            move |epoch, key| async move {
                Event::Featured(epoch, catalog.featured_detail(&key).await)
            },
        );
    }

    fn publish(&self) {
        let data = self.home.value().cloned().unwrap_or_default();
        self.state.publish(HomeState {
            trending: data.trending,
            upcoming: data.upcoming,
            curated: data.curated,
            featured: self.featured.snapshot(),
            featured_loading: self.featured.is_loading(),
            is_loading: self.home.is_loading(),
            last_error: self.home.last_error(),
            phase: self.home.phase(),
        });
    }
}
