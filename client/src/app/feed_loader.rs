//! Feed loader
//!
//! Fetches pages of posts from a paginated listing and appends them to a
//! display sink, stopping once the server reports no further pages. At most
//! one fetch is ever in flight per loader; concurrent triggers (e.g. rapid
//! scroll events) coalesce into no-ops rather than queue. There is no
//! cancellation: an in-flight request runs to completion before the guard
//! clears.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::entities::{Session, UserRef};
use crate::domain::ports::{BlogApi, LoadIndicator, PostListing, PostPage, PostSink};
use crate::error::{ApiError, FeedError};

/// Where a loader pulls posts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// The global home feed (`/posts`)
    Home,
    /// A single user's posts (`/users/{id}/posts`)
    User(UserRef),
}

/// Adapter giving a loader its listing capability from any `BlogApi`.
pub struct ScopedListing<A> {
    api: Arc<A>,
    scope: FeedScope,
}

impl<A> ScopedListing<A> {
    pub fn new(api: Arc<A>, scope: FeedScope) -> Self {
        Self { api, scope }
    }
}

#[async_trait::async_trait]
impl<A: BlogApi> PostListing for ScopedListing<A> {
    async fn fetch_page(
        &self,
        page: u32,
        limit: u32,
        session: Option<&Session>,
    ) -> Result<PostPage, ApiError> {
        match self.scope {
            FeedScope::Home => self.api.list_posts(page, limit, session).await,
            FeedScope::User(user) => self.api.list_user_posts(user, page, limit, session).await,
        }
    }
}

/// Pagination progress for one feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Next page to request (1-based).
    pub page: u32,
    /// False once the server reported its last page, or the feed came back
    /// empty; only a reset makes the loader fetch again.
    pub has_more: bool,
}

impl PageCursor {
    fn start() -> Self {
        Self {
            page: 1,
            has_more: true,
        }
    }
}

/// Result of a single `load_next_page` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Posts were appended to the sink in server order.
    Appended { count: usize },
    /// Page 1 came back with no items at all - distinct from reaching the
    /// end of a feed that had some.
    Empty,
    /// The call was coalesced away: a fetch was already in flight, or the
    /// feed is exhausted and no reset was requested.
    Skipped,
}

/// Loads a paginated feed incrementally into a display sink.
pub struct FeedLoader<L, S, I>
where
    L: PostListing,
    S: PostSink,
    I: LoadIndicator,
{
    listing: Arc<L>,
    sink: Arc<S>,
    indicator: Arc<I>,
    page_size: u32,
    cursor: Mutex<PageCursor>,
    in_flight: AtomicBool,
}

impl<L, S, I> FeedLoader<L, S, I>
where
    L: PostListing,
    S: PostSink,
    I: LoadIndicator,
{
    pub fn new(listing: Arc<L>, sink: Arc<S>, indicator: Arc<I>, page_size: u32) -> Self {
        Self {
            listing,
            sink,
            indicator,
            page_size,
            cursor: Mutex::new(PageCursor::start()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Current pagination progress.
    pub fn cursor(&self) -> PageCursor {
        *self.cursor.lock().unwrap()
    }

    /// Whether another page may still be available.
    pub fn has_more(&self) -> bool {
        self.cursor().has_more
    }

    /// Fetch the next page and append its posts to the sink.
    ///
    /// With `reset`, the sink is cleared and pagination restarts at page 1
    /// before the fetch. The loading indicator is visible for the duration
    /// of the request and reset on every exit path. On failure the cursor
    /// is unchanged, so the next trigger retries the same page.
    pub async fn load_next_page(
        &self,
        session: Option<&Session>,
        reset: bool,
    ) -> Result<FeedOutcome, FeedError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Ok(FeedOutcome::Skipped);
        }

        let page = {
            let mut cursor = self.cursor.lock().unwrap();
            if !cursor.has_more && !reset {
                self.in_flight.store(false, Ordering::SeqCst);
                return Ok(FeedOutcome::Skipped);
            }
            if reset {
                *cursor = PageCursor::start();
                self.sink.clear();
            }
            cursor.page
        };

        self.indicator.set_visible(true);
        let result = self
            .listing
            .fetch_page(page, self.page_size, session)
            .await;
        self.indicator.set_visible(false);

        let outcome = match result {
            Ok(fetched) => Ok(self.apply_page(page, fetched)),
            Err(source) => {
                tracing::warn!("feed page {} failed: {}", page, source);
                if page == 1 {
                    Err(FeedError::InitialLoad { source })
                } else {
                    Err(FeedError::SubsequentLoad { page, source })
                }
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    fn apply_page(&self, page: u32, fetched: PostPage) -> FeedOutcome {
        if fetched.posts.is_empty() && page == 1 {
            // An empty feed stays frozen until an explicit reset.
            self.cursor.lock().unwrap().has_more = false;
            return FeedOutcome::Empty;
        }

        let count = fetched.posts.len();
        let exhausted = fetched.current_page >= fetched.last_page;
        for post in fetched.posts {
            self.sink.append(post);
        }

        let mut cursor = self.cursor.lock().unwrap();
        cursor.page += 1;
        if exhausted {
            cursor.has_more = false;
        }

        FeedOutcome::Appended { count }
    }
}
