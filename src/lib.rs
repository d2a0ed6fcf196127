//! diglib: a digital library service with paginated book content.
//!
//! The server side stores book records in a [`BookRepository`] and book text
//! in a [`BlobStore`], and serves the text one character-counted page at a
//! time. The [`client`] module consumes the same REST API: it lists and
//! uploads books, steps through pages with a [`client::PageNavigator`] and
//! reassembles whole books for download.
//!
//! # Example
//!
//! ```no_run
//! use diglib::{Config, LibraryServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let server = LibraryServer::from_config(Config::default()).await?;
//!     server.run().await
//! }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod server;
pub mod service;
pub mod storage;

// Re-exports for convenience
pub use config::{Args, Config, DEFAULT_BUCKET, DEFAULT_PAGE_SIZE, DEFAULT_PORT};
pub use error::{ErrorCode, LibraryError, LibraryResult};
pub use models::{Book, BookPage, BookQuery, NewBook, PagedContent, ReadingTime};
pub use server::LibraryServer;
pub use service::{paginate, ContentService, Paginator};
pub use storage::{BlobStore, BookRepository, FsBlobStore, MemoryBlobStore, MemoryBookRepository};
