//! Paginated catalog browsing
//!
//! [`TaskListPager`] keeps the zero-based paging state of a catalog view and
//! the rows currently shown. Fetching never fails from the caller's point of
//! view: any error degrades to an empty single-page list.

use crate::error::SdkResult;
use async_trait::async_trait;
use codejudge_core::{PageQuery, PageSize, PaginationState, Task, TaskPage};
use tracing::{debug, error};

/// Anything that can serve one page of the catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetch one page; `query.page` is one-based.
    async fn fetch_page(&self, query: PageQuery) -> SdkResult<TaskPage>;
}

/// The request a fetch was issued with.
///
/// Fetches are not cancelled, so a slow response applied after a newer one
/// overwrites it. Callers that interleave fetches see last-writer-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub query: PageQuery,
    pub page_size: PageSize,
}

/// Catalog view state plus the source it pages through.
#[derive(Debug)]
pub struct TaskListPager<S> {
    source: S,
    state: PaginationState,
    tasks: Vec<Task>,
    loading: bool,
}

impl<S: TaskSource> TaskListPager<S> {
    pub fn new(source: S, page_size: PageSize) -> Self {
        Self {
            source,
            state: PaginationState::new(page_size),
            tasks: Vec::new(),
            loading: false,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Rows of the current page.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Rows paired with their one-based position in the whole catalog.
    pub fn rows(&self) -> impl Iterator<Item = (u64, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (self.state.row_number(i), task))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    /// The request the next fetch would send.
    pub fn request(&self) -> PageRequest {
        PageRequest {
            query: self.state.query(),
            page_size: self.state.page_size(),
        }
    }

    /// Apply the outcome of a fetch issued with `request`.
    ///
    /// The outcome is applied unconditionally, even if the state has moved
    /// on since `request` was taken.
    pub fn apply(&mut self, request: PageRequest, outcome: SdkResult<TaskPage>) {
        match outcome {
            Ok(page) => {
                debug!(
                    page = request.query.page,
                    rows = page.results.len(),
                    count = ?page.count,
                    "catalog page loaded"
                );
                self.state.apply_count_for(page.count, request.page_size);
                self.tasks = page.results;
            }
            Err(e) => {
                error!("Error loading tasks: {}", e);
                self.tasks.clear();
                self.state.reset_total();
            }
        }
    }

    /// Fetch the current page. Always resolves.
    pub async fn fetch(&mut self) -> &[Task] {
        let request = self.request();
        self.loading = true;
        let outcome = self.source.fetch_page(request.query).await;
        self.apply(request, outcome);
        self.loading = false;
        &self.tasks
    }

    /// Go forward one page and fetch it. Does nothing on the last page.
    pub async fn next_page(&mut self) -> bool {
        if !self.state.advance() {
            return false;
        }
        self.fetch().await;
        true
    }

    /// Go back one page and fetch it. Does nothing on the first page.
    pub async fn previous_page(&mut self) -> bool {
        if !self.state.retreat() {
            return false;
        }
        self.fetch().await;
        true
    }

    /// Jump to a zero-based page and fetch it.
    pub async fn go_to(&mut self, page: u32) -> &[Task] {
        self.state.seek(page);
        self.fetch().await
    }

    /// Switch page size, go back to the first page and fetch it.
    pub async fn set_page_size(&mut self, page_size: PageSize) -> &[Task] {
        self.state.set_page_size(page_size);
        self.fetch().await
    }
}
