//! Client for the library REST API.
//!
//! [`LibraryClient`] mirrors the server's request/response contract,
//! [`PageNavigator`] steps a reader through a book and [`export`] writes
//! downloaded books to disk.

mod error;
pub mod export;
mod library;
mod navigator;

pub use error::{ClientError, ClientResult};
pub use library::{read_all_pages, LibraryClient, PageSource, DEFAULT_BASE_URL};
pub use navigator::{Navigation, PageNavigator};
