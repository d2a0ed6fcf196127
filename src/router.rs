//! Request routing for the library REST API.

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::Response,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::config::Config;
use crate::context::RequestContext;
use crate::error::{ErrorCode, LibraryError, LibraryResult};
use crate::handlers;
use crate::service::ContentService;
use crate::storage::BookRepository;

/// Application state shared between handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub books: Arc<dyn BookRepository>,
    pub content: ContentService,
}

/// Creates the main router for the library service.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size;

    Router::new()
        .route("/health", get(health_handler))
        .route("/genres", get(genres_handler))
        .route("/books", get(list_books_handler).post(add_book_handler))
        .route("/books/:id", get(get_book_handler).delete(delete_book_handler))
        .route("/books/:id/content", get(book_content_handler))
        .fallback(fallback_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Converts a handler result into a response tagged with the request ID.
fn respond(ctx: &RequestContext, result: LibraryResult<Response<Body>>) -> Response<Body> {
    match result {
        Ok(response) => response,
        Err(e) => e.with_request_id(&ctx.request_id).into_response(),
    }
}

async fn health_handler(ctx: RequestContext) -> Response<Body> {
    let result = handlers::health(&ctx).await;
    respond(&ctx, result)
}

async fn genres_handler(State(state): State<AppState>, ctx: RequestContext) -> Response<Body> {
    let result = handlers::get_genres(&ctx, &state.config).await;
    respond(&ctx, result)
}

async fn list_books_handler(State(state): State<AppState>, ctx: RequestContext) -> Response<Body> {
    let result = handlers::list_books(&ctx, state.books.clone()).await;
    respond(&ctx, result)
}

async fn get_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ctx: RequestContext,
) -> Response<Body> {
    let result = handlers::get_book(&ctx, state.books.clone(), &id).await;
    respond(&ctx, result)
}

async fn book_content_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ctx: RequestContext,
) -> Response<Body> {
    let result = handlers::get_book_content(&ctx, state.books.clone(), &state.content, &id).await;
    respond(&ctx, result)
}

async fn add_book_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response<Body> {
    let result = match multipart {
        Ok(multipart) => {
            handlers::add_book(&ctx, state.books.clone(), &state.content, multipart).await
        }
        Err(rejection) => Err(LibraryError::invalid_input(format!(
            "Expected a multipart form: {}",
            rejection.body_text()
        ))),
    };
    respond(&ctx, result)
}

async fn delete_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ctx: RequestContext,
) -> Response<Body> {
    let result = handlers::delete_book(&ctx, state.books.clone(), &state.content, &id).await;
    respond(&ctx, result)
}

async fn fallback_handler(ctx: RequestContext) -> Response<Body> {
    LibraryError::with_message(
        ErrorCode::RouteNotFound,
        format!("No route for {} {}", ctx.method, ctx.uri.path()),
    )
    .with_request_id(&ctx.request_id)
    .into_response()
}
