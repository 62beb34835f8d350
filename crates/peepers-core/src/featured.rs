//! Rotating featured selection on the home page.

use std::time::Duration;

use crate::error::FetchError;
use crate::models::{DetailViewModel, FeaturedCandidate, FeaturedState};
use crate::query::{Effect, Epoch, Outcome, QueryController};

/// Default interval between rotations.
pub const DEFAULT_ROTATION: Duration = Duration::from_secs(10);

/// Identifies one detail fetch: which pool, which slot, which title.
///
/// The pool generation is part of the key so that a replaced pool always
/// refetches, even when its first entry happens to be the same title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedKey {
    pub generation: u64,
    pub index: usize,
    pub candidate: FeaturedCandidate,
}

/// Detail record plus its chosen trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedDetail {
    pub detail: DetailViewModel,
    pub trailer_key: String,
}

#[derive(Debug, Default)]
pub struct FeaturedController {
    pool: Vec<FeaturedCandidate>,
    generation: u64,
    active_index: usize,
    query: QueryController<FeaturedKey, FeaturedDetail>,
}

impl FeaturedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool and fetch its first entry.
    ///
    /// An empty pool drops any pending detail fetch and stops rotation; the
    /// last committed details stay visible.
    pub fn set_pool(&mut self, pool: Vec<FeaturedCandidate>) -> Effect<FeaturedKey> {
        self.generation += 1;
        self.active_index = 0;
        self.pool = pool;

        if self.pool.is_empty() {
            self.query.invalidate();
            return Effect::None;
        }
        tracing::debug!(size = self.pool.len(), generation = self.generation, "featured pool replaced");
        self.request()
    }

    /// Advance to the next entry, wrapping at the end of the pool.
    pub fn tick(&mut self) -> Effect<FeaturedKey> {
        if self.pool.is_empty() {
            return Effect::None;
        }
        self.active_index = (self.active_index + 1) % self.pool.len();
        self.request()
    }

    fn request(&mut self) -> Effect<FeaturedKey> {
        let Some(candidate) = self.pool.get(self.active_index).cloned() else {
            return Effect::None;
        };
        self.query.set_key(
            FeaturedKey {
                generation: self.generation,
                index: self.active_index,
                candidate,
            },
            Duration::ZERO,
        )
    }

    /// Detail fetches are never debounced, so this only passes through.
    pub fn debounce_elapsed(&mut self, epoch: Epoch) -> Effect<FeaturedKey> {
        self.query.debounce_elapsed(epoch)
    }

    pub fn settle(&mut self, epoch: Epoch, result: Result<FeaturedDetail, FetchError>) -> Outcome {
        self.query.settle(epoch, result)
    }

    pub fn dispose(&mut self) {
        self.query.dispose();
    }

    pub fn is_rotating(&self) -> bool {
        !self.pool.is_empty()
    }

    pub fn pool(&self) -> &[FeaturedCandidate] {
        &self.pool
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&DetailViewModel> {
        self.query.value().map(|f| &f.detail)
    }

    /// Empty when the active entry has no trailer.
    pub fn trailer_key(&self) -> &str {
        self.query
            .value()
            .map(|f| f.trailer_key.as_str())
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.query.is_loading()
    }

    pub fn snapshot(&self) -> FeaturedState {
        FeaturedState {
            pool: self.pool.clone(),
            active_index: self.active_index,
            details: self.active_item().cloned(),
            trailer_key: self.trailer_key().to_string(),
        }
    }
}
