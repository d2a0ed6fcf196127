//! Storage layer for book content and metadata.

mod blob;
mod books;

pub use blob::*;
pub use books::*;
