//! Genre list handler.

use axum::{
    body::Body,
    http::{Response, StatusCode},
};
use tracing::info;

use crate::config::Config;
use crate::context::RequestContext;
use crate::error::LibraryResult;
use crate::models::load_genres;

use super::json_response;

/// GET /genres - List the genres offered for new books.
pub async fn get_genres(ctx: &RequestContext, config: &Config) -> LibraryResult<Response<Body>> {
    info!("Fetching genres");
    let genres = load_genres(config.genres_file.as_deref()).await?;
    json_response(ctx, StatusCode::OK, &genres)
}
