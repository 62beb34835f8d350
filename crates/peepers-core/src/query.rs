//! Debounced, epoch-guarded fetch state machine.
//!
//! A [`QueryController`] owns the "what should be on screen" slice for one
//! query: the current key, the last committed value, the loading flag and
//! the last error. It performs no I/O. Every transition returns an
//! [`Effect`] describing the work the caller must schedule (a debounce
//! sleep or a fetch), tagged with the epoch that was current when the work
//! was requested. The caller feeds completions back through
//! [`QueryController::debounce_elapsed`] and [`QueryController::settle`].
//!
//! Phases:
//!
//! ```text
//! Idle ─set_key(delay>0)─▶ Debouncing ─elapsed─▶ Fetching ─settle─▶ Settled | Failed
//!   └────────set_key(delay=0)──────────────────────▲
//! ```
//!
//! Every key change claims a new epoch. A completion whose epoch is no
//! longer current is a stale result: it is dropped without touching state.
//! This is the only cancellation mechanism; in-flight requests are never
//! aborted.

use std::fmt;
use std::time::Duration;

use crate::error::{ErrorKind, FetchError};

/// Monotonic per-controller request counter.
pub type Epoch = u64;

/// Default debounce applied to keystroke-driven keys.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for the input to go quiet before fetching.
    Debouncing,
    Fetching,
    /// The last fetch for the current key committed a value.
    Settled,
    /// The last fetch for the current key failed; any prior value is kept.
    Failed,
}

/// Work the owner of a controller has to schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<K> {
    None,
    /// Sleep for `delay`, then call `debounce_elapsed(epoch)`.
    Debounce { epoch: Epoch, delay: Duration },
    /// Fetch `key`, then call `settle(epoch, result)`.
    Fetch { epoch: Epoch, key: K },
}

impl<K> Effect<K> {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// What `settle` did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    Failed(ErrorKind),
    /// Superseded by a newer key, or the controller was disposed.
    StaleDiscarded,
}

pub struct QueryController<K, V> {
    key: Option<K>,
    epoch: Epoch,
    phase: Phase,
    value: Option<V>,
    is_loading: bool,
    last_error: Option<ErrorKind>,
    disposed: bool,
}

impl<K, V> Default for QueryController<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            epoch: 0,
            phase: Phase::Idle,
            value: None,
            is_loading: false,
            last_error: None,
            disposed: false,
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for QueryController<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryController")
            .field("key", &self.key)
            .field("epoch", &self.epoch)
            .field("phase", &self.phase)
            .field("has_value", &self.value.is_some())
            .field("is_loading", &self.is_loading)
            .field("last_error", &self.last_error)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl<K: Clone + PartialEq + fmt::Debug, V> QueryController<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Move to a new key.
    ///
    /// An unchanged key is a no-op. Otherwise a new epoch is claimed, which
    /// supersedes any pending debounce and any in-flight fetch. A zero
    /// `delay` starts fetching immediately.
    pub fn set_key(&mut self, key: K, delay: Duration) -> Effect<K> {
        if self.disposed || self.key.as_ref() == Some(&key) {
            return Effect::None;
        }

        self.epoch += 1;
        self.key = Some(key.clone());

        if delay.is_zero() {
            self.begin_fetch(key)
        } else {
            tracing::trace!(epoch = self.epoch, ?delay, "debouncing");
            self.phase = Phase::Debouncing;
            Effect::Debounce {
                epoch: self.epoch,
                delay,
            }
        }
    }

    /// The debounce sleep for `epoch` finished.
    ///
    /// Ignored unless `epoch` is still current and nothing has started
    /// fetching for it yet.
    pub fn debounce_elapsed(&mut self, epoch: Epoch) -> Effect<K> {
        if self.disposed || epoch != self.epoch || self.phase != Phase::Debouncing {
            return Effect::None;
        }
        match self.key.clone() {
            Some(key) => self.begin_fetch(key),
            None => Effect::None,
        }
    }

    fn begin_fetch(&mut self, key: K) -> Effect<K> {
        tracing::debug!(epoch = self.epoch, ?key, "fetching");
        self.phase = Phase::Fetching;
        self.is_loading = true;
        Effect::Fetch {
            epoch: self.epoch,
            key,
        }
    }

    /// Deliver the result of the fetch started at `epoch`.
    pub fn settle(&mut self, epoch: Epoch, result: Result<V, FetchError>) -> Outcome {
        if self.disposed || epoch != self.epoch || self.phase != Phase::Fetching {
            tracing::debug!(epoch, current = self.epoch, "discarding stale result");
            return Outcome::StaleDiscarded;
        }

        self.is_loading = false;
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.last_error = None;
                self.phase = Phase::Settled;
                Outcome::Committed
            }
            Err(e) => {
                tracing::warn!(epoch, key = ?self.key, error = %e, "fetch failed");
                self.last_error = Some(e.kind);
                self.phase = Phase::Failed;
                Outcome::Failed(e.kind)
            }
        }
    }

    /// Supersede whatever is pending without starting anything new.
    ///
    /// The key is forgotten, so setting the same key again fetches again.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.key = None;
        self.phase = Phase::Idle;
        self.is_loading = false;
    }

    /// Drop the committed value (the key and any pending work are kept).
    pub fn clear_value(&mut self) {
        self.value = None;
    }

    /// Tear down: every later completion is stale regardless of epoch.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.is_loading = false;
    }
}
