//! Metadata repository for book records.

use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ErrorCode, LibraryError, LibraryResult};
use crate::models::{Book, BookPage, BookQuery, NewBook, SortDirection, SortField};

/// Trait for book metadata storage operations.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Stores a new book and returns it with its assigned id.
    async fn create(&self, book: NewBook, file_name: String) -> LibraryResult<Book>;
    async fn get(&self, id: u64) -> LibraryResult<Book>;
    async fn delete(&self, id: u64) -> LibraryResult<Book>;
    /// Returns one page of books matching the query.
    async fn find(&self, query: &BookQuery) -> LibraryResult<BookPage>;
}

/// In-memory implementation of the book repository.
pub struct MemoryBookRepository {
    books: DashMap<u64, Book>,
    next_id: AtomicU64,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_books(a: &Book, b: &Book, field: SortField) -> CmpOrdering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Author => a.author.cmp(&b.author),
        SortField::Genre => a.genre.cmp(&b.genre),
        SortField::Isbn => a.isbn.cmp(&b.isbn),
        SortField::Year => a.year.cmp(&b.year),
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn create(&self, book: NewBook, file_name: String) -> LibraryResult<Book> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let book = book.into_book(id, file_name);
        self.books.insert(id, book.clone());
        Ok(book)
    }

    async fn get(&self, id: u64) -> LibraryResult<Book> {
        self.books
            .get(&id)
            .map(|b| b.value().clone())
            .ok_or_else(|| book_not_found(id))
    }

    async fn delete(&self, id: u64) -> LibraryResult<Book> {
        self.books
            .remove(&id)
            .map(|(_, book)| book)
            .ok_or_else(|| book_not_found(id))
    }

    async fn find(&self, query: &BookQuery) -> LibraryResult<BookPage> {
        if query.size == 0 {
            return Err(LibraryError::with_message(
                ErrorCode::InvalidQueryParameterValue,
                "Page size must not be less than one",
            ));
        }

        // Snapshot matching books first so no shard lock is held while sorting
        let mut matching: Vec<Book> = self
            .books
            .iter()
            .filter(|entry| {
                query
                    .filter
                    .as_ref()
                    .map(|f| f.matches(entry.value()))
                    .unwrap_or(true)
            })
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare_books(a, b, query.sort_by);
            let ordering = match query.sort_dir {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let total = matching.len();
        let content: Vec<Book> = matching
            .into_iter()
            .skip(query.page.saturating_mul(query.size))
            .take(query.size)
            .collect();

        Ok(BookPage::new(content, total, query.page, query.size))
    }
}

fn book_not_found(id: u64) -> LibraryError {
    LibraryError::with_message(
        ErrorCode::BookNotFound,
        format!("Book with ID: {} not found", id),
    )
}
