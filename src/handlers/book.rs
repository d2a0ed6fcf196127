//! Book metadata handlers.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart},
    http::{Response, StatusCode},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

use crate::context::RequestContext;
use crate::error::{ErrorCode, LibraryError, LibraryResult};
use crate::models::{generate_file_name, NewBook};
use crate::service::ContentService;
use crate::storage::BookRepository;

use super::{json_response, parse_book_id, text_response};

/// GET /books - List books with paging, sorting and filtering.
pub async fn list_books(
    ctx: &RequestContext,
    books: Arc<dyn BookRepository>,
) -> LibraryResult<Response<Body>> {
    let query = ctx.book_query()?;
    info!(
        page = query.page,
        size = query.size,
        sort_by = query.sort_by.as_str(),
        sort_dir = query.sort_dir.as_str(),
        filter = ?query.filter,
        "Fetching books"
    );

    let page = books.find(&query).await?;
    info!("Fetched {} books", page.total_elements);

    json_response(ctx, StatusCode::OK, &page)
}

/// GET /books/{id} - Get a single book record.
pub async fn get_book(
    ctx: &RequestContext,
    books: Arc<dyn BookRepository>,
    id: &str,
) -> LibraryResult<Response<Body>> {
    let id = parse_book_id(id)?;
    info!(id, "Fetching book");

    let book = books.get(id).await?;
    json_response(ctx, StatusCode::OK, &book)
}

/// Fields of an upload form.
struct UploadForm {
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    isbn: Option<String>,
    year: Option<String>,
    content: Option<Bytes>,
}

fn multipart_error(e: MultipartError) -> LibraryError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        LibraryError::new(ErrorCode::RequestBodyTooLarge)
    } else {
        LibraryError::invalid_input(format!("Malformed upload form: {}", e.body_text()))
    }
}

fn required<T>(value: Option<T>, name: &str) -> LibraryResult<T> {
    value.ok_or_else(|| {
        LibraryError::with_message(
            ErrorCode::MissingRequiredParameter,
            format!("Required parameter '{}' is not present", name),
        )
    })
}

async fn read_upload_form(mut multipart: Multipart) -> LibraryResult<UploadForm> {
    let mut form = UploadForm {
        title: None,
        author: None,
        genre: None,
        isbn: None,
        year: None,
        content: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };
        match name.as_str() {
            "content" => form.content = Some(field.bytes().await.map_err(multipart_error)?),
            "title" | "author" | "genre" | "isbn" | "year" => {
                let value = field.text().await.map_err(multipart_error)?;
                let slot = match name.as_str() {
                    "title" => &mut form.title,
                    "author" => &mut form.author,
                    "genre" => &mut form.genre,
                    "isbn" => &mut form.isbn,
                    _ => &mut form.year,
                };
                *slot = Some(value);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /books - Upload a new book (multipart form with the text in `content`).
///
/// The text is stored before the record is created; if the record cannot be
/// created the stored text is removed again.
pub async fn add_book(
    ctx: &RequestContext,
    books: Arc<dyn BookRepository>,
    content: &ContentService,
    multipart: Multipart,
) -> LibraryResult<Response<Body>> {
    let form = read_upload_form(multipart).await?;

    let year = required(form.year, "year")?;
    let year = year.trim().parse::<i32>().map_err(|_| {
        LibraryError::invalid_input(format!("Year must be a whole number, got '{}'", year))
    })?;
    let book = NewBook {
        title: required(form.title, "title")?,
        author: required(form.author, "author")?,
        genre: required(form.genre, "genre")?,
        isbn: required(form.isbn, "isbn")?,
        year,
    };
    let data = required(form.content, "content")?;

    if let Err(e) = book.validate() {
        warn!(
            title = %book.title,
            author = %book.author,
            isbn = %book.isbn,
            year = book.year,
            "Illegal values provided for book: {}",
            e.message
        );
        return Err(e);
    }

    let file_name = generate_file_name(&book.title, &mut rand::thread_rng());
    let location = content.store_file(&file_name, data).await?;

    let title = book.title.clone();
    let created = match books.create(book, file_name.clone()).await {
        Ok(created) => created,
        Err(e) => {
            if let Err(cleanup) = content.delete_book_content(Some(&file_name)).await {
                warn!(file_name = %file_name, "Failed to remove orphaned content: {}", cleanup);
            }
            return Err(e);
        }
    };

    info!(id = created.id, location = %location, "Added new book: {}", title);
    text_response(ctx, StatusCode::OK, format!("ID:{}", created.id))
}

/// DELETE /books/{id} - Delete a book record and its text.
pub async fn delete_book(
    ctx: &RequestContext,
    books: Arc<dyn BookRepository>,
    content: &ContentService,
    id: &str,
) -> LibraryResult<Response<Body>> {
    let id = parse_book_id(id)?;
    let book = books.get(id).await?;

    match content.delete_book_content(book.file_name.as_deref()).await {
        Ok(true) => {}
        Ok(false) => warn!(id, "Book had no stored content"),
        Err(e) if e.code == ErrorCode::InvalidFileReference => {
            warn!(id, "Book has no file reference")
        }
        Err(e) => return Err(e),
    }

    books.delete(id).await?;
    info!(id, "Deleted book");

    text_response(ctx, StatusCode::OK, "Book deleted successfully")
}
