//! Character-based pagination of book text.

use crate::error::{ErrorCode, LibraryError, LibraryResult};
use crate::models::PagedContent;

/// Number of pages needed for `total_size` characters; an empty text still has one page.
pub fn total_pages(total_size: usize, page_size: usize) -> usize {
    total_size.div_ceil(page_size).max(1)
}

/// Cuts page `page_number` of `page_size` characters out of `full_text`.
///
/// Boundaries are counted in `char`s, so multi-byte text is never split inside
/// a code point. Fails with `InvalidPageSize` when `page_size` is zero and
/// `InvalidPageNumber` when the page lies outside `0..total_pages`.
pub fn paginate(full_text: &str, page_number: i64, page_size: usize) -> LibraryResult<PagedContent> {
    if page_size == 0 {
        return Err(LibraryError::new(ErrorCode::InvalidPageSize));
    }

    let total_size = full_text.chars().count();
    let total_pages = total_pages(total_size, page_size);

    let page_number = usize::try_from(page_number)
        .ok()
        .filter(|&n| n < total_pages)
        .ok_or_else(|| LibraryError::new(ErrorCode::InvalidPageNumber))?;

    let start = page_number * page_size;
    let start_byte = byte_offset(full_text, start);
    let rest = &full_text[start_byte..];
    let content = &rest[..byte_offset(rest, page_size)];

    Ok(PagedContent::new(
        content.to_string(),
        page_number,
        total_pages,
        total_size,
    ))
}

/// Byte offset of the `n`th character, or the string length when past the end.
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Paginator carrying the page size used when a request does not give one.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    default_page_size: usize,
}

impl Paginator {
    pub fn new(default_page_size: usize) -> Self {
        Self { default_page_size }
    }

    pub fn paginate(
        &self,
        full_text: &str,
        page_number: i64,
        page_size: Option<usize>,
    ) -> LibraryResult<PagedContent> {
        paginate(full_text, page_number, page_size.unwrap_or(self.default_page_size))
    }
}
