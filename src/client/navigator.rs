//! Page-by-page reader over a [`PageSource`].

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::models::PagedContent;

use super::error::ClientResult;
use super::library::PageSource;

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The fetched page is now current.
    Applied(PagedContent),
    /// Nothing to do: no book is open or the reader is at the first/last page.
    Unchanged,
    /// A newer navigation started while this one was in flight; the response
    /// was dropped.
    Stale,
}

#[derive(Default)]
struct NavigatorState {
    book_id: Option<u64>,
    current: Option<PagedContent>,
    last_error: Option<String>,
}

/// Drives a reader through a book with next/previous navigation.
///
/// Each navigation takes a new generation number before fetching. A response
/// is applied only if its generation is still the newest, so the last
/// navigation wins no matter in which order responses arrive. A failed fetch
/// keeps the current page and records the error for display.
pub struct PageNavigator {
    source: Arc<dyn PageSource>,
    page_size: Option<usize>,
    generation: AtomicU64,
    state: Mutex<NavigatorState>,
}

impl PageNavigator {
    pub fn new(source: Arc<dyn PageSource>, page_size: Option<usize>) -> Self {
        Self {
            source,
            page_size,
            generation: AtomicU64::new(0),
            state: Mutex::new(NavigatorState::default()),
        }
    }

    /// Opens `book_id` at its first page.
    pub async fn open(&self, book_id: u64) -> ClientResult<Navigation> {
        self.navigate(book_id, 0).await
    }

    /// Moves to the next page. No request is made on the last page.
    pub async fn next_page(&self) -> ClientResult<Navigation> {
        let target = {
            let state = self.state.lock();
            match (state.book_id, &state.current) {
                (Some(book_id), Some(page)) if !page.is_last() => {
                    Some((book_id, page.page_number() + 1))
                }
                _ => None,
            }
        };

        match target {
            Some((book_id, page)) => self.navigate(book_id, page).await,
            None => Ok(Navigation::Unchanged),
        }
    }

    /// Moves to the previous page. No request is made on the first page.
    pub async fn prev_page(&self) -> ClientResult<Navigation> {
        let target = {
            let state = self.state.lock();
            match (state.book_id, &state.current) {
                (Some(book_id), Some(page)) if !page.is_first() => {
                    Some((book_id, page.page_number() - 1))
                }
                _ => None,
            }
        };

        match target {
            Some((book_id, page)) => self.navigate(book_id, page).await,
            None => Ok(Navigation::Unchanged),
        }
    }

    async fn navigate(&self, book_id: u64, page: usize) -> ClientResult<Navigation> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.source.fetch_page(book_id, page, self.page_size).await;

        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(book_id, page, generation, "Dropping stale page response");
            return Ok(Navigation::Stale);
        }

        match result {
            Ok(content) => {
                state.book_id = Some(book_id);
                state.current = Some(content.clone());
                state.last_error = None;
                Ok(Navigation::Applied(content))
            }
            Err(e) => {
                state.last_error = Some(format!("Failed to load page {}: {}", page + 1, e));
                Err(e)
            }
        }
    }

    /// The page currently displayed.
    pub fn current(&self) -> Option<PagedContent> {
        self.state.lock().current.clone()
    }

    pub fn book_id(&self) -> Option<u64> {
        self.state.lock().book_id
    }

    /// Message describing the last failed navigation, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }
}
