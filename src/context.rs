//! Request context extraction and handling.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::{header::HeaderMap, request::Parts, Method, Uri},
};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ErrorCode, LibraryError, LibraryResult};
use crate::models::{BookFilter, BookQuery, SortDirection, SortField, DEFAULT_LIST_SIZE};

/// Header carrying the request ID on requests and responses.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extracted request context containing all relevant information.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID, taken from the caller's `x-request-id` header or generated.
    pub request_id: String,
    /// HTTP method.
    pub method: Method,
    /// Request URI.
    pub uri: Uri,
    /// Query parameters.
    pub query_params: HashMap<String, String>,
}

impl RequestContext {
    /// Creates a new request context from request parts.
    pub fn new(
        method: Method,
        uri: Uri,
        headers: &HeaderMap,
        query_params: HashMap<String, String>,
    ) -> Self {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            request_id,
            method,
            uri,
            query_params,
        }
    }

    /// Returns the value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    /// Parses a query parameter, failing on values that do not parse.
    fn parse_param<T: FromStr>(&self, name: &str) -> LibraryResult<Option<T>> {
        match self.query_param(name) {
            None | Some("") => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid_query_value(name, value)),
        }
    }

    /// Returns the `page` query parameter for content requests, defaulting to 0.
    ///
    /// Negative values are passed through so the paginator can reject them
    /// as an invalid page number.
    pub fn page(&self) -> LibraryResult<i64> {
        Ok(self.parse_param("page")?.unwrap_or(0))
    }

    /// Returns the `pageSize` query parameter for content requests.
    pub fn page_size(&self) -> LibraryResult<Option<usize>> {
        match self.parse_param::<i64>("pageSize")? {
            None => Ok(None),
            Some(size) if size <= 0 => Err(LibraryError::new(ErrorCode::InvalidPageSize)),
            Some(size) => Ok(Some(usize::try_from(size).unwrap_or(usize::MAX))),
        }
    }

    /// Returns the listing query for `GET /books`.
    pub fn book_query(&self) -> LibraryResult<BookQuery> {
        BookQuery::from_query(&self.query_params)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = LibraryError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).map_err(|e| {
            LibraryError::with_message(ErrorCode::InvalidQueryParameterValue, e.body_text())
        })?;

        Ok(Self::new(
            parts.method.clone(),
            parts.uri.clone(),
            &parts.headers,
            query,
        ))
    }
}

fn invalid_query_value(name: &str, value: &str) -> LibraryError {
    LibraryError::with_message(
        ErrorCode::InvalidQueryParameterValue,
        format!("Invalid value for query parameter {}: {}", name, value),
    )
}

impl BookQuery {
    /// Builds a listing query from `GET /books` query parameters.
    ///
    /// Only one filter applies; `title` wins over `author`, which wins over `genre`.
    pub fn from_query(query: &HashMap<String, String>) -> LibraryResult<Self> {
        let number = |name: &str, default: usize| -> LibraryResult<usize> {
            match query.get(name).map(|v| v.trim()) {
                None | Some("") => Ok(default),
                Some(value) => value.parse().map_err(|_| invalid_query_value(name, value)),
            }
        };

        let page = number("page", 0)?;
        let size = number("size", DEFAULT_LIST_SIZE)?;
        if size == 0 {
            return Err(LibraryError::with_message(
                ErrorCode::InvalidQueryParameterValue,
                "Page size must not be less than one",
            ));
        }

        let sort_by = match query.get("sortBy") {
            None => SortField::default(),
            Some(value) => {
                SortField::from_str(value).ok_or_else(|| invalid_query_value("sortBy", value))?
            }
        };
        let sort_dir = query
            .get("sortDir")
            .map(|v| SortDirection::parse(v))
            .unwrap_or_default();

        let filter = if let Some(title) = query.get("title") {
            Some(BookFilter::Title(title.clone()))
        } else if let Some(author) = query.get("author") {
            Some(BookFilter::Author(author.clone()))
        } else {
            query.get("genre").map(|genre| BookFilter::Genre(genre.clone()))
        };

        Ok(Self {
            page,
            size,
            sort_by,
            sort_dir,
            filter,
        })
    }
}
