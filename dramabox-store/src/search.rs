//! Paged search sessions with capped skip-ahead.
//!
//! When a search page fails, the session may wait briefly and move on to the
//! next page instead of aborting. Skips are capped per session: once
//! `max_skipped_pages` consecutive pages have been skipped, the next failure
//! is surfaced and the session ends.

use std::time::Duration;

use dramabox_core::{CatalogError, CatalogItem, CatalogResult, CatalogSource, FailureKind};
use tracing::{debug, warn};

// ============================================================================
// Skip-Ahead Policy
// ============================================================================

/// How a search session reacts to a failed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipAheadPolicy {
    /// Consecutive failed pages that may be skipped.
    pub max_skipped_pages: u32,
    /// Delay before requesting the following page.
    pub delay: Duration,
}

impl SkipAheadPolicy {
    /// Creates a policy with the given cap and a 500ms delay.
    pub fn new(max_skipped_pages: u32) -> Self {
        Self {
            max_skipped_pages,
            delay: Duration::from_millis(500),
        }
    }

    /// Never skips a failed page.
    pub fn disabled() -> Self {
        Self {
            max_skipped_pages: 0,
            delay: Duration::ZERO,
        }
    }

    /// Sets the delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for SkipAheadPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

// ============================================================================
// Search Session
// ============================================================================

/// Result of one successful [`SearchSession::load_next`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    /// Page that finally succeeded.
    pub page: u32,
    /// Items added by that page.
    pub added: usize,
    /// Failed pages skipped on the way.
    pub skipped: u32,
}

/// Accumulated results of one search keyword.
#[derive(Debug, Clone)]
pub struct SearchSession {
    keyword: String,
    policy: SkipAheadPolicy,
    items: Vec<CatalogItem>,
    next_page: u32,
    has_more: bool,
    skipped_pages: Vec<u32>,
    consecutive_skips: u32,
}

impl SearchSession {
    /// Starts a session.
    ///
    /// Fails with `InvalidArgument` for a blank keyword.
    pub fn new(keyword: &str, policy: SkipAheadPolicy) -> CatalogResult<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "search keyword must not be empty".to_string(),
            ));
        }

        Ok(Self {
            keyword: keyword.to_string(),
            policy,
            items: Vec::new(),
            next_page: 1,
            has_more: true,
            skipped_pages: Vec::new(),
            consecutive_skips: 0,
        })
    }

    /// Returns the trimmed keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Returns the accumulated results.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Returns true if another page may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Returns the page the next call will request.
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Returns every page skipped so far.
    pub fn skipped_pages(&self) -> &[u32] {
        &self.skipped_pages
    }

    /// Loads the next page, skipping failed pages within the policy.
    ///
    /// Returns `Ok(None)` when the session has no more pages. The skip budget
    /// spans calls and is restored only by a page that loads; a failure past
    /// the budget ends the session.
    pub async fn load_next<S: CatalogSource>(
        &mut self,
        source: &S,
    ) -> CatalogResult<Option<SearchProgress>> {
        if !self.has_more {
            return Ok(None);
        }

        let mut skipped = 0;
        loop {
            let page = self.next_page;
            match source.search(&self.keyword, page).await {
                Ok(result) => {
                    self.has_more = result.has_more;
                    self.next_page = page + 1;
                    self.consecutive_skips = 0;

                    let added = result.items.len();
                    if page == 1 {
                        self.items = result.items;
                    } else {
                        self.items.extend(result.items);
                    }

                    debug!(keyword = %self.keyword, page, added, "Search page loaded");
                    return Ok(Some(SearchProgress {
                        page,
                        added,
                        skipped,
                    }));
                }
                Err(error) if error.kind() == FailureKind::InvalidArgument => return Err(error),
                Err(error) if self.consecutive_skips < self.policy.max_skipped_pages => {
                    warn!(
                        keyword = %self.keyword,
                        page,
                        error = %error,
                        "Search page failed, skipping to next page"
                    );
                    skipped += 1;
                    self.consecutive_skips += 1;
                    self.skipped_pages.push(page);
                    self.next_page = page + 1;
                    tokio::time::sleep(self.policy.delay).await;
                }
                Err(error) => {
                    warn!(
                        keyword = %self.keyword,
                        page,
                        skipped = self.consecutive_skips,
                        "Giving up on search"
                    );
                    self.has_more = false;
                    return Err(error);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
