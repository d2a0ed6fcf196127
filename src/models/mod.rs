//! Data models for the digital library.

mod blob;
mod book;
mod genre;
mod page;

pub use blob::*;
pub use book::*;
pub use genre::*;
pub use page::*;
