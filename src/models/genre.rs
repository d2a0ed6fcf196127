//! Genre list served by `GET /genres`.

use std::path::Path;

use crate::error::{ErrorCode, LibraryError, LibraryResult};

/// Genres offered when no genre file is configured.
pub const DEFAULT_GENRES: &[&str] = &[
    "Adventure",
    "Biography",
    "Children's",
    "Classic",
    "Comedy",
    "Crime",
    "Drama",
    "Fantasy",
    "Historical Fiction",
    "Horror",
    "Mystery",
    "Non-fiction",
    "Philosophy",
    "Poetry",
    "Romance",
    "Science Fiction",
    "Short Stories",
    "Thriller",
];

pub fn default_genres() -> Vec<String> {
    DEFAULT_GENRES.iter().map(|g| g.to_string()).collect()
}

/// Reads the genre list from a JSON array of strings at `path`, or returns
/// the built-in list when no file is configured.
pub async fn load_genres(path: Option<&Path>) -> LibraryResult<Vec<String>> {
    let Some(path) = path else {
        return Ok(default_genres());
    };

    let data = tokio::fs::read(path).await.map_err(|e| {
        LibraryError::with_message(
            ErrorCode::StorageFailure,
            format!("Failed to load genres from {}: {}", path.display(), e),
        )
    })?;

    serde_json::from_slice(&data).map_err(|e| {
        LibraryError::with_message(
            ErrorCode::StorageFailure,
            format!("Failed to parse genres from {}: {}", path.display(), e),
        )
    })
}
