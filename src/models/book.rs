//! Book data models.

use chrono::{Datelike, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{LibraryError, LibraryResult};

/// Maximum length in characters for titles and author names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Extra characters added on top of the title length for storage names.
pub const FILE_NAME_PADDING: usize = 5;

/// Alphabet used for generated storage names.
const FILE_NAME_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A book record held by the metadata repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub isbn: String,
    /// Key of the book's text in the blob store.
    pub file_name: Option<String>,
}

impl Book {
    /// Descriptive fields rendered one per line for display.
    pub fn metadata(&self) -> String {
        format!(
            "Title: {}\nAuthor: {}\nGenre: {}\nISBN: {}\nYear: {}",
            self.title, self.author, self.genre, self.isbn, self.year
        )
    }
}

/// Descriptive fields for a book that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub isbn: String,
    pub year: i32,
}

impl NewBook {
    /// Validates every field against the current calendar year.
    pub fn validate(&self) -> LibraryResult<()> {
        self.validate_with_max_year(Utc::now().year())
    }

    /// Validates every field, accepting publication years up to `max_year`.
    pub fn validate_with_max_year(&self, max_year: i32) -> LibraryResult<()> {
        validate_title(&self.title)?;
        validate_author(&self.author)?;
        validate_isbn(&self.isbn)?;
        validate_year(self.year, max_year)?;
        Ok(())
    }

    /// Turns the validated fields into a stored record.
    pub fn into_book(self, id: u64, file_name: String) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            genre: self.genre,
            isbn: self.isbn,
            file_name: Some(file_name),
        }
    }
}

pub fn validate_title(title: &str) -> LibraryResult<()> {
    validate_name("Title", title)
}

pub fn validate_author(author: &str) -> LibraryResult<()> {
    validate_name("Author", author)
}

fn validate_name(field: &str, value: &str) -> LibraryResult<()> {
    if value.is_empty() {
        return Err(LibraryError::invalid_input(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(LibraryError::invalid_input(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// ISBNs are stored as exactly 13 digits without separators.
pub fn validate_isbn(isbn: &str) -> LibraryResult<()> {
    static ISBN: OnceLock<Regex> = OnceLock::new();
    let pattern = ISBN.get_or_init(|| Regex::new(r"^[0-9]{13}$").expect("valid ISBN pattern"));
    if !pattern.is_match(isbn) {
        return Err(LibraryError::invalid_input("ISBN must be 13 digits"));
    }
    Ok(())
}

pub fn validate_year(year: i32, max_year: i32) -> LibraryResult<()> {
    if year < 0 || year > max_year {
        return Err(LibraryError::invalid_input(format!(
            "Year must be between 0 and {}",
            max_year
        )));
    }
    Ok(())
}

/// Generates a random storage name for a book with the given title.
///
/// The name has `chars(title) + 5` alphanumeric characters followed by `.txt`.
/// The random source is explicit so callers can make the result reproducible.
pub fn generate_file_name<R: Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    let length = title.chars().count() + FILE_NAME_PADDING;
    let mut name: String = (0..length)
        .map(|_| FILE_NAME_ALPHABET[rng.gen_range(0..FILE_NAME_ALPHABET.len())] as char)
        .collect();
    name.push_str(".txt");
    name
}

/// Sortable book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    #[default]
    Title,
    Author,
    Genre,
    Isbn,
    Year,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Genre => "genre",
            SortField::Isbn => "isbn",
            SortField::Year => "year",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "id" => Some(SortField::Id),
            "title" => Some(SortField::Title),
            "author" => Some(SortField::Author),
            "genre" => Some(SortField::Genre),
            "isbn" => Some(SortField::Isbn),
            "year" => Some(SortField::Year),
            _ => None,
        }
    }
}

/// Sort direction for book listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Anything other than `asc` (case-insensitive) sorts descending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Case-insensitive substring filter applied to a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    Title(String),
    Author(String),
    Genre(String),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        let (haystack, needle) = match self {
            BookFilter::Title(t) => (&book.title, t),
            BookFilter::Author(a) => (&book.author, a),
            BookFilter::Genre(g) => (&book.genre, g),
        };
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Query parameter name and value for this filter.
    pub fn as_param(&self) -> (&'static str, &str) {
        match self {
            BookFilter::Title(t) => ("title", t),
            BookFilter::Author(a) => ("author", a),
            BookFilter::Genre(g) => ("genre", g),
        }
    }
}

/// Default number of books per listing page.
pub const DEFAULT_LIST_SIZE: usize = 10;

/// Paging, sorting and filtering for book listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    pub page: usize,
    pub size: usize,
    pub sort_by: SortField,
    pub sort_dir: SortDirection,
    pub filter: Option<BookFilter>,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_LIST_SIZE,
            sort_by: SortField::default(),
            sort_dir: SortDirection::default(),
            filter: None,
        }
    }
}

impl BookQuery {
    /// Query string pairs for this query, as accepted by `GET /books`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("sortDir", self.sort_dir.as_str().to_string()),
        ];
        if let Some(filter) = &self.filter {
            let (name, value) = filter.as_param();
            params.push((name, value.to_string()));
        }
        params
    }
}

/// One page of a book listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPage {
    pub content: Vec<Book>,
    pub total_elements: usize,
    pub total_pages: usize,
    pub number: usize,
    pub size: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl BookPage {
    pub fn new(content: Vec<Book>, total_elements: usize, number: usize, size: usize) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };
        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }
}
