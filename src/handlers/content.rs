//! Paged book content handler.

use axum::{
    body::Body,
    http::{Response, StatusCode},
};
use std::sync::Arc;
use tracing::info;

use crate::context::RequestContext;
use crate::error::LibraryResult;
use crate::service::ContentService;
use crate::storage::BookRepository;

use super::{json_response, parse_book_id};

/// GET /books/{id}/content?page=&pageSize= - Read one page of a book's text.
pub async fn get_book_content(
    ctx: &RequestContext,
    books: Arc<dyn BookRepository>,
    content: &ContentService,
    id: &str,
) -> LibraryResult<Response<Body>> {
    let id = parse_book_id(id)?;
    let page = ctx.page()?;
    let page_size = ctx.page_size()?;
    info!(id, page, page_size = ?page_size, "Fetching book content");

    let book = books.get(id).await?;
    let paged = content
        .read_book_content(book.file_name.as_deref(), page, page_size)
        .await?;

    json_response(ctx, StatusCode::OK, &paged)
}
