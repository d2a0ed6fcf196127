//! Content services built on the storage layer.

mod content;
mod paginator;

pub use content::*;
pub use paginator::*;
