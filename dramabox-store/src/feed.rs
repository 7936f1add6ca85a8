//! Caller-side page accumulation for catalog feeds.
//!
//! A [`CatalogFeed`] holds the list shown for one feed. Page 1 replaces the
//! list, later pages append to it. A request is split into
//! [`CatalogFeed::begin_reset`] / [`CatalogFeed::begin_next`] and
//! [`CatalogFeed::apply`] so several may be in flight at once; only results
//! for the current generation and the expected page are applied.

use dramabox_core::{
    CatalogError, CatalogItem, CatalogPage, CatalogResult, CatalogSource, FailureKind, FeedKind,
};
use tracing::debug;

use crate::generation::{Generation, GenerationCounter};

/// A page request issued by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Generation the request belongs to.
    pub generation: Generation,
    /// 1-based page number.
    pub page: u32,
}

/// Effect of applying a result to a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    /// Page 1 arrived and replaced the list.
    Replaced {
        /// Items now in the list.
        count: usize,
    },
    /// A later page was appended.
    Appended {
        /// Items added.
        added: usize,
    },
    /// The request was superseded; nothing changed.
    Stale,
    /// The request failed; the list is unchanged.
    Failed(FailureKind),
}

/// Accumulated state of one catalog feed.
#[derive(Debug)]
pub struct CatalogFeed {
    feed: FeedKind,
    items: Vec<CatalogItem>,
    next_page: u32,
    has_more: bool,
    last_error: Option<CatalogError>,
    generations: GenerationCounter,
}

impl CatalogFeed {
    /// Creates an empty feed.
    pub fn new(feed: FeedKind) -> Self {
        Self {
            feed,
            items: Vec::new(),
            next_page: 1,
            has_more: true,
            last_error: None,
            generations: GenerationCounter::new(),
        }
    }

    /// Returns which feed this is.
    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    /// Returns the accumulated items.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Returns true if another page may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Returns the number of pages applied so far.
    pub fn pages_loaded(&self) -> u32 {
        self.next_page - 1
    }

    /// Returns the error from the last applied request, if it failed.
    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    /// Starts a reload from page 1, superseding every request in flight.
    pub fn begin_reset(&mut self) -> PageRequest {
        self.next_page = 1;
        self.has_more = true;
        PageRequest {
            generation: self.generations.advance(),
            page: 1,
        }
    }

    /// Starts loading the next page, if there is one.
    pub fn begin_next(&mut self) -> Option<PageRequest> {
        self.has_more.then(|| PageRequest {
            generation: self.generations.current(),
            page: self.next_page,
        })
    }

    /// Applies the result of `request`.
    pub fn apply(&mut self, request: PageRequest, result: CatalogResult<CatalogPage>) -> FeedUpdate {
        if !self.generations.is_current(request.generation) || request.page != self.next_page {
            debug!(
                feed = %self.feed.display_name(),
                page = request.page,
                expected = self.next_page,
                "Discarding stale page"
            );
            return FeedUpdate::Stale;
        }

        match result {
            Ok(page) => {
                self.last_error = None;
                self.has_more = page.has_more;
                self.next_page = request.page + 1;

                if request.page == 1 {
                    self.items = page.items;
                    FeedUpdate::Replaced {
                        count: self.items.len(),
                    }
                } else {
                    let added = page.items.len();
                    self.items.extend(page.items);
                    FeedUpdate::Appended { added }
                }
            }
            Err(error) => {
                let kind = error.kind();
                self.last_error = Some(error);
                FeedUpdate::Failed(kind)
            }
        }
    }

    /// Reloads page 1 from `source`.
    pub async fn load_first<S: CatalogSource>(&mut self, source: &S) -> FeedUpdate {
        let request = self.begin_reset();
        let result = source.list_feed(self.feed, request.page).await;
        self.apply(request, result)
    }

    /// Loads the next page from `source`; `None` when there are no more pages.
    pub async fn load_more<S: CatalogSource>(&mut self, source: &S) -> Option<FeedUpdate> {
        let request = self.begin_next()?;
        let result = source.list_feed(self.feed, request.page).await;
        Some(self.apply(request, result))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[&str], has_more: bool) -> CatalogResult<CatalogPage> {
        let items = ids
            .iter()
            .map(|id| CatalogItem::new(*id, format!("Drama {id}"), "https://img/c.jpg"))
            .collect();
        Ok(CatalogPage::new(items, has_more))
    }

    fn ids(feed: &CatalogFeed) -> Vec<&str> {
        feed.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_first_page_replaces_then_appends() {
        let mut feed = CatalogFeed::new(FeedKind::New);

        let first = feed.begin_reset();
        assert_eq!(feed.apply(first, page(&["a", "b"], true)), FeedUpdate::Replaced { count: 2 });

        let second = feed.begin_next().unwrap();
        assert_eq!(second.page, 2);
        assert_eq!(feed.apply(second, page(&["c"], false)), FeedUpdate::Appended { added: 1 });

        assert_eq!(ids(&feed), vec!["a", "b", "c"]);
        assert!(!feed.has_more());
        assert!(feed.begin_next().is_none());
        assert_eq!(feed.pages_loaded(), 2);
    }

    #[test]
    fn test_reset_replaces_accumulated_list() {
        let mut feed = CatalogFeed::new(FeedKind::ForYou);
        let r = feed.begin_reset();
        feed.apply(r, page(&["a"], true));
        let r = feed.begin_next().unwrap();
        feed.apply(r, page(&["b"], true));

        let r = feed.begin_reset();
        feed.apply(r, page(&["z"], true));
        assert_eq!(ids(&feed), vec!["z"]);
    }

    #[test]
    fn test_superseded_result_discarded() {
        let mut feed = CatalogFeed::new(FeedKind::Trending);
        let old = feed.begin_reset();
        let new = feed.begin_reset();

        assert_eq!(feed.apply(new, page(&["fresh"], true)), FeedUpdate::Replaced { count: 1 });
        assert_eq!(feed.apply(old, page(&["stale"], true)), FeedUpdate::Stale);
        assert_eq!(ids(&feed), vec!["fresh"]);
    }

    #[test]
    fn test_load_more_in_flight_across_reset_is_stale() {
        let mut feed = CatalogFeed::new(FeedKind::New);
        let r = feed.begin_reset();
        feed.apply(r, page(&["a"], true));

        let more = feed.begin_next().unwrap();
        let reset = feed.begin_reset();

        assert_eq!(feed.apply(more, page(&["old-2"], true)), FeedUpdate::Stale);
        feed.apply(reset, page(&["b"], true));
        assert_eq!(ids(&feed), vec!["b"]);
    }

    #[test]
    fn test_duplicate_page_result_is_stale() {
        let mut feed = CatalogFeed::new(FeedKind::New);
        let r = feed.begin_reset();
        feed.apply(r, page(&["a"], true));

        let more = feed.begin_next().unwrap();
        feed.apply(more, page(&["b"], true));
        assert_eq!(feed.apply(more, page(&["b"], true)), FeedUpdate::Stale);
        assert_eq!(feed.items().len(), 2);
    }

    #[test]
    fn test_failure_keeps_items() {
        let mut feed = CatalogFeed::new(FeedKind::New);
        let r = feed.begin_reset();
        feed.apply(r, page(&["a"], true));

        let more = feed.begin_next().unwrap();
        let update = feed.apply(more, Err(CatalogError::NotFound("x".to_string())));

        assert_eq!(update, FeedUpdate::Failed(FailureKind::NotFound));
        assert_eq!(ids(&feed), vec!["a"]);
        assert!(feed.last_error().is_some());
        assert_eq!(feed.begin_next().unwrap().page, 2);
    }
}
