//! Paged content data models.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Average word length in characters used for reading estimates.
pub const AVERAGE_WORD_LENGTH: usize = 5;

/// Average reading speed in words per minute.
pub const WORDS_PER_MINUTE: usize = 183;

/// Estimated time to read a whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadingTime {
    pub hours: usize,
    pub minutes: usize,
}

impl ReadingTime {
    /// Estimates the reading time for a document of `total_size` characters.
    pub fn estimate(total_size: usize) -> Self {
        let words = total_size / AVERAGE_WORD_LENGTH;
        let total_minutes = words / WORDS_PER_MINUTE;
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        }
    }

    /// Short form used by reader front ends, e.g. `1 h, 49 min`.
    pub fn abbreviated(&self) -> String {
        format!("{} h, {} min", self.hours, self.minutes)
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hours, {} minutes", self.hours, self.minutes)
    }
}

impl Serialize for ReadingTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One page of a book's text plus pagination metadata.
///
/// Built per request from the full text and never mutated afterwards. The
/// reading time always describes the whole document, not the page, and is
/// recomputed from `total_size` whenever a page is built or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PagedContentWire")]
pub struct PagedContent {
    content: String,
    page_number: usize,
    total_pages: usize,
    page_size: usize,
    total_size: usize,
    reading_time: ReadingTime,
}

impl PagedContent {
    /// Creates a page. `page_size` is taken from the character count of `content`.
    pub fn new(content: String, page_number: usize, total_pages: usize, total_size: usize) -> Self {
        let page_size = content.chars().count();
        Self {
            content,
            page_number,
            total_pages,
            page_size,
            total_size,
            reading_time: ReadingTime::estimate(total_size),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Zero-based index of this page.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of characters on this page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of characters in the whole document.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn reading_time(&self) -> ReadingTime {
        self.reading_time
    }

    pub fn is_first(&self) -> bool {
        self.page_number == 0
    }

    pub fn is_last(&self) -> bool {
        self.page_number.saturating_add(1) >= self.total_pages
    }

    /// Reader-facing summary, e.g. `Page 2 of 5` followed by the reading time.
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {}\nReading time: {}",
            self.page_number.saturating_add(1),
            self.total_pages,
            self.reading_time.abbreviated()
        )
    }
}

/// Lenient wire form: absent or null fields fall back to empty values.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PagedContentWire {
    content: Option<String>,
    page_number: Option<usize>,
    total_pages: Option<usize>,
    total_size: Option<usize>,
}

impl From<PagedContentWire> for PagedContent {
    fn from(wire: PagedContentWire) -> Self {
        PagedContent::new(
            wire.content.unwrap_or_default(),
            wire.page_number.unwrap_or_default(),
            wire.total_pages.unwrap_or_default(),
            wire.total_size.unwrap_or_default(),
        )
    }
}
