use std::time::Duration;

use crate::error::FetchError;
use crate::models::{CardPage, FilterId, ListViewState, MediaKind, QueryKey};
use crate::query::{Effect, Epoch, Outcome, QueryController};

/// Search, filter and page cursor for one list page.
///
/// Every action recomputes the [`QueryKey`] and hands it to the inner
/// query controller; the returned [`Effect`] must be scheduled by the
/// caller.
#[derive(Debug)]
pub struct ListController {
    kind: MediaKind,
    search_text: String,
    filter: Option<FilterId>,
    page: u32,
    total_pages: u32,
    debounce: Duration,
    query: QueryController<QueryKey, CardPage>,
}

impl ListController {
    pub fn new(kind: MediaKind, debounce: Duration) -> Self {
        Self {
            kind,
            search_text: String::new(),
            filter: None,
            page: 1,
            total_pages: 1,
            debounce,
            query: QueryController::new(),
        }
    }

    /// Start from a filter other than "none" (genre pages).
    pub fn with_filter(mut self, filter: Option<FilterId>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_search_text(mut self, text: &str) -> Self {
        self.search_text = text.trim().to_string();
        self
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filter(&self) -> Option<&FilterId> {
        self.filter.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.query.is_loading()
    }

    fn key(&self) -> QueryKey {
        QueryKey {
            search_text: self.search_text.clone(),
            page: self.page,
            filter: self.filter.clone(),
            kind: self.kind,
        }
    }

    /// Only typed searches are debounced.
    fn delay(&self) -> Duration {
        if self.search_text.is_empty() {
            Duration::ZERO
        } else {
            self.debounce
        }
    }

    fn request(&mut self) -> Effect<QueryKey> {
        let key = self.key();
        let delay = self.delay();
        self.query.set_key(key, delay)
    }

    /// Issue the initial fetch for the current key, without debounce.
    pub fn start(&mut self) -> Effect<QueryKey> {
        let key = self.key();
        self.query.set_key(key, Duration::ZERO)
    }

    fn reset_cursor(&mut self) {
        self.page = 1;
        self.total_pages = 1;
        self.query.clear_value();
    }

    pub fn set_search_text(&mut self, text: &str) -> Effect<QueryKey> {
        let text = text.trim();
        if text == self.search_text {
            return Effect::None;
        }
        self.search_text = text.to_string();
        self.reset_cursor();
        self.request()
    }

    pub fn set_filter(&mut self, filter: Option<FilterId>) -> Effect<QueryKey> {
        if filter == self.filter {
            return Effect::None;
        }
        self.filter = filter;
        self.reset_cursor();
        self.request()
    }

    pub fn go_to_previous(&mut self) -> Effect<QueryKey> {
        if self.page <= 1 || self.is_loading() {
            return Effect::None;
        }
        self.page -= 1;
        self.request()
    }

    pub fn go_to_next(&mut self) -> Effect<QueryKey> {
        if self.page >= self.total_pages || self.is_loading() {
            return Effect::None;
        }
        self.page += 1;
        self.request()
    }

    pub fn debounce_elapsed(&mut self, epoch: Epoch) -> Effect<QueryKey> {
        self.query.debounce_elapsed(epoch)
    }

    pub fn settle(&mut self, epoch: Epoch, result: Result<CardPage, FetchError>) -> Outcome {
        let outcome = self.query.settle(epoch, result);
        if outcome == Outcome::Committed {
            if let Some(page) = self.query.value() {
                self.total_pages = page.total_pages.max(1);
            }
        }
        outcome
    }

    pub fn dispose(&mut self) {
        self.query.dispose();
    }

    pub fn snapshot(&self) -> ListViewState {
        ListViewState {
            items: self
                .query
                .value()
                .map(|p| p.items.clone())
                .unwrap_or_default(),
            page: self.page,
            total_pages: self.total_pages,
            is_loading: self.query.is_loading(),
            last_error: self.query.last_error(),
            phase: self.query.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{CardLink, CardViewModel};
    use crate::query::{Phase, DEFAULT_DEBOUNCE};

    fn card(title: &str) -> CardViewModel {
        CardViewModel {
            link: CardLink::Unlinked,
            title: title.to_string(),
            year: "N/A".into(),
            rating: "N/A".into(),
            genre_label: String::new(),
            image_url: String::new(),
        }
    }

    fn page_of(titles: &[&str], total_pages: u32) -> CardPage {
        CardPage {
            items: titles.iter().map(|t| card(t)).collect(),
            total_pages,
        }
    }

    /// Run a fetch effect to completion with the given page.
    fn complete(list: &mut ListController, effect: Effect<QueryKey>, page: CardPage) -> QueryKey {
        match effect {
            Effect::Fetch { epoch, key } => {
                assert_eq!(list.settle(epoch, Ok(page)), Outcome::Committed);
                key
            }
            other => panic!("Expected Fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_start_fetches_popular_page_one() {
        let mut list = ListController::new(MediaKind::Movie, DEFAULT_DEBOUNCE);
        let effect = list.start();
        let key = complete(&mut list, effect, page_of(&["A"], 5));
        assert_eq!(key, QueryKey::new(MediaKind::Movie));
        assert_eq!(list.total_pages(), 5);
    }

    #[test]
    fn test_initial_search_is_not_debounced() {
        let mut list =
            ListController::new(MediaKind::Movie, DEFAULT_DEBOUNCE).with_search_text(" dune ");
        match list.start() {
            Effect::Fetch { key, .. } => assert_eq!(key.search_text, "dune"),
            other => panic!("Expected Fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_navigation_bounds_are_noops() {
        let mut list = ListController::new(MediaKind::Movie, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&["A"], 2));

        assert!(list.go_to_previous().is_none());
        assert_eq!(list.page(), 1);

        let effect = list.go_to_next();
        let key = complete(&mut list, effect, page_of(&["B"], 2));
        assert_eq!(key.page, 2);

        assert!(list.go_to_next().is_none());
        assert_eq!(list.page(), 2);
    }

    #[test]
    fn test_navigation_blocked_while_loading() {
        let mut list = ListController::new(MediaKind::Series, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&["A"], 5));

        let _in_flight = list.go_to_next();
        assert!(list.is_loading());
        assert!(list.go_to_next().is_none());
        assert!(list.go_to_previous().is_none());
        assert_eq!(list.page(), 2);
    }

    #[test]
    fn test_new_search_resets_page_and_clears_items() {
        let mut list = ListController::new(MediaKind::Movie, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&["A"], 5));
        let effect = list.go_to_next();
        complete(&mut list, effect, page_of(&["B"], 5));
        assert_eq!(list.page(), 2);

        let effect = list.set_search_text("  matrix ");
        let state = list.snapshot();
        assert_eq!(state.page, 1);
        assert!(state.items.is_empty());
        assert_eq!(state.phase, Phase::Debouncing);
        assert!(matches!(effect, Effect::Debounce { delay, .. } if delay == DEFAULT_DEBOUNCE));
        assert_eq!(list.search_text(), "matrix");

        let Effect::Debounce { epoch, .. } = effect else {
            unreachable!()
        };
        let fetch = list.debounce_elapsed(epoch);
        let key = complete(&mut list, fetch, page_of(&["The Matrix"], 3));
        assert_eq!(key.page, 1);
        assert_eq!(key.search_text, "matrix");
        assert_eq!(list.snapshot().items[0].title, "The Matrix");
    }

    #[test]
    fn test_new_query_forgets_previous_page_count() {
        let mut list = ListController::new(MediaKind::Movie, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&["A"], 5));

        let _debounce = list.set_search_text("zzzzzzzz");
        assert_eq!(list.total_pages(), 1);
        assert!(list.go_to_next().is_none());
        assert_eq!(list.page(), 1);

        let mut list = ListController::new(MediaKind::Series, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&["A"], 5));

        let _fetch = list.set_filter(Some(FilterId::Genre(18)));
        assert_eq!(list.total_pages(), 1);
        assert!(list.go_to_next().is_none());
        assert_eq!(list.page(), 1);
    }

    #[test]
    fn test_whitespace_only_change_is_ignored() {
        let mut list = ListController::new(MediaKind::Anime, DEFAULT_DEBOUNCE);
        let _ = list.set_search_text("naruto");
        assert!(list.set_search_text("naruto  ").is_none());
    }

    #[test]
    fn test_clearing_search_fetches_immediately() {
        let mut list = ListController::new(MediaKind::Movie, DEFAULT_DEBOUNCE);
        let _ = list.set_search_text("dune");
        let effect = list.set_search_text("");
        assert!(matches!(effect, Effect::Fetch { ref key, .. } if !key.is_search()));
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut list = ListController::new(MediaKind::Series, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&["A"], 4));
        let effect = list.go_to_next();
        complete(&mut list, effect, page_of(&["B"], 4));

        let effect = list.set_filter(Some(FilterId::Genre(18)));
        let key = complete(&mut list, effect, page_of(&["Drama"], 2));
        assert_eq!(key.page, 1);
        assert_eq!(key.filter, Some(FilterId::Genre(18)));
        assert!(list.set_filter(Some(FilterId::Genre(18))).is_none());
    }

    #[test]
    fn test_failed_page_keeps_items() {
        let mut list = ListController::new(MediaKind::Movie, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&["A"], 3));

        let Effect::Fetch { epoch, .. } = list.go_to_next() else {
            panic!("Expected Fetch");
        };
        list.settle(epoch, Err(FetchError::network("timeout")));

        let state = list.snapshot();
        assert_eq!(state.items[0].title, "A");
        assert_eq!(state.last_error, Some(ErrorKind::Network));
        assert_eq!(state.page, 2);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_zero_total_pages_is_clamped() {
        let mut list = ListController::new(MediaKind::Anime, DEFAULT_DEBOUNCE);
        let effect = list.start();
        complete(&mut list, effect, page_of(&[], 0));
        assert_eq!(list.total_pages(), 1);
    }
}
