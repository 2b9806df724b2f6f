//! Paginated post listing
//!
//! `PaginatedList` owns the posts loaded so far and the cursor of the next
//! page. `load_next_page` fetches the cursor, transforms the results and
//! swaps them into the state in one step, so a failed fetch never leaves a
//! half-applied page behind. Only one load runs at a time; a call made while
//! another is pending returns `LoadOutcome::InFlight` without fetching.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::content::{summarize, PostSummary};
use crate::error::ListError;
use crate::helpers::DateFormatter;
use crate::source::{PageFetcher, PageResult};

/// Posts loaded so far and the pagination position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Loaded posts in fetch order
    pub posts: Vec<PostSummary>,
    /// Cursor URL of the next page, `None` once exhausted
    pub next_cursor: Option<String>,
    pub current_page: u32,
    /// Message of the last failed load, cleared by the next successful one
    pub last_error: Option<String>,
}

impl ListState {
    pub fn new(posts: Vec<PostSummary>, next_cursor: Option<String>, current_page: u32) -> Self {
        Self {
            posts,
            next_cursor,
            current_page,
            last_error: None,
        }
    }

    /// Build the initial state from the first page of a query
    pub fn seed(page: PageResult, formatter: &DateFormatter) -> Result<Self, ListError> {
        let posts = summarize(page.results, formatter)?;
        Ok(Self::new(posts, page.next_page, page.page_number.max(1)))
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Result of a `load_next_page` call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and its posts appended
    Loaded { appended: usize },
    /// No cursor left; nothing was fetched
    Exhausted,
    /// Another load is pending; nothing was fetched
    InFlight,
}

/// Clears the in-flight flag when the load finishes, whatever the outcome
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Incrementally loaded list of post summaries
pub struct PaginatedList {
    fetcher: Arc<dyn PageFetcher>,
    formatter: DateFormatter,
    state: RwLock<ListState>,
    in_flight: AtomicBool,
}

impl PaginatedList {
    pub fn new(fetcher: Arc<dyn PageFetcher>, formatter: DateFormatter, state: ListState) -> Self {
        Self {
            fetcher,
            formatter,
            state: RwLock::new(state),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ListState {
        self.state.read().await.clone()
    }

    pub async fn is_exhausted(&self) -> bool {
        self.state.read().await.is_exhausted()
    }

    /// Fetch the next page and append its posts.
    ///
    /// On error the posts, cursor and page number are left as they were and
    /// the error message is recorded in `last_error`.
    pub async fn load_next_page(&self) -> Result<LoadOutcome, ListError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Load already in flight, ignoring");
            return Ok(LoadOutcome::InFlight);
        };

        let cursor = self.state.read().await.next_cursor.clone();
        let Some(cursor) = cursor else {
            tracing::debug!("No next page to load");
            return Ok(LoadOutcome::Exhausted);
        };

        match self.fetch_posts(&cursor).await {
            Ok((page_number, next_page, posts)) => {
                let appended = posts.len();
                let mut state = self.state.write().await;
                state.posts.extend(posts);
                state.next_cursor = next_page;
                state.current_page = page_number;
                state.last_error = None;
                tracing::info!(
                    "Loaded page {} ({} new posts, {} total)",
                    page_number,
                    appended,
                    state.posts.len()
                );
                Ok(LoadOutcome::Loaded { appended })
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", cursor, e);
                self.state.write().await.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_posts(
        &self,
        cursor: &str,
    ) -> Result<(u32, Option<String>, Vec<PostSummary>), ListError> {
        let page = self.fetcher.fetch_page(cursor).await?;
        let posts = summarize(page.results, &self.formatter)?;
        Ok((page.page_number, page.next_page, posts))
    }
}
