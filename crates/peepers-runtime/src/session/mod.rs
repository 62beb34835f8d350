//! Per-page event loops.
//!
//! Each session is one tokio task that exclusively owns its controllers.
//! Handles send commands over an unbounded channel and read snapshots from a
//! `watch` channel; dropping or disposing a handle ends the loop, after which
//! every outstanding response is discarded.

mod detail;
mod home;
mod list;
mod quick_search;

pub use detail::{DetailHandle, DetailState};
pub use home::{HomeHandle, HomeState};
pub use list::{ListHandle, ListOptions, ListPageState};
pub use quick_search::{QuickSearchHandle, QuickSearchState};

pub(crate) use detail::spawn as spawn_detail;
pub(crate) use home::spawn as spawn_home;
pub(crate) use list::spawn as spawn_list;
pub(crate) use quick_search::spawn as spawn_quick_search;

use tokio::sync::watch;

/// A session's state plus how many handle actions it has processed.
#[derive(Debug, Clone)]
struct Published<S> {
    state: S,
    handled: u64,
}

/// Create the publishing and watching halves for a session.
pub(crate) fn channel<S: Clone>(initial: S) -> (Publisher<S>, Watcher<S>) {
    let (tx, rx) = watch::channel(Published {
        state: initial,
        handled: 0,
    });
    (Publisher { tx, handled: 0 }, Watcher { rx, sent: 0 })
}

/// Session-side half.
#[derive(Debug)]
pub(crate) struct Publisher<S> {
    tx: watch::Sender<Published<S>>,
    handled: u64,
}

impl<S> Publisher<S> {
    /// Count one handle action as processed.
    pub(crate) fn handled(&mut self) {
        self.handled += 1;
    }

    pub(crate) fn publish(&self, state: S) {
        self.tx.send_replace(Published {
            state,
            handled: self.handled,
        });
    }
}

/// Handle-side half.
#[derive(Debug)]
pub(crate) struct Watcher<S> {
    rx: watch::Receiver<Published<S>>,
    sent: u64,
}

impl<S: Clone> Watcher<S> {
    /// Call before sending an action to the session.
    pub(crate) fn sent(&mut self) {
        self.sent += 1;
    }

    pub(crate) fn snapshot(&self) -> S {
        self.rx.borrow().state.clone()
    }

    /// Wait for the next publish. `false` once the session has ended.
    pub(crate) async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until every action sent so far has been processed and the state
    /// satisfies `done`. Returns the latest state if the session ends first.
    pub(crate) async fn wait_until(&mut self, mut done: impl FnMut(&S) -> bool) -> S {
        let sent = self.sent;
        let result = self
            .rx
            .wait_for(|p| p.handled >= sent && done(&p.state))
            .await
            .map(|p| p.state.clone());
        result.unwrap_or_else(|_| self.snapshot())
    }
}
