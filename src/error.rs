//! Library error types and error response formatting.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hyper::ext::ReasonPhrase;
use serde::Serialize;
use thiserror::Error;

/// Library error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not found
    BookNotFound,
    RouteNotFound,

    // Invalid argument
    InvalidPageNumber,
    InvalidPageSize,
    InvalidInput,
    InvalidQueryParameterValue,
    MissingRequiredParameter,
    InvalidFileReference,
    InvalidBlobKey,
    RequestBodyTooLarge,

    // Storage failure
    ContentMissing,
    StorageFailure,
    InternalError,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BookNotFound => "BookNotFound",
            ErrorCode::RouteNotFound => "RouteNotFound",
            ErrorCode::InvalidPageNumber => "InvalidPageNumber",
            ErrorCode::InvalidPageSize => "InvalidPageSize",
            ErrorCode::InvalidInput => "InvalidInput",
            ErrorCode::InvalidQueryParameterValue => "InvalidQueryParameterValue",
            ErrorCode::MissingRequiredParameter => "MissingRequiredParameter",
            ErrorCode::InvalidFileReference => "InvalidFileReference",
            ErrorCode::InvalidBlobKey => "InvalidBlobKey",
            ErrorCode::RequestBodyTooLarge => "RequestBodyTooLarge",
            ErrorCode::ContentMissing => "ContentMissing",
            ErrorCode::StorageFailure => "StorageFailure",
            ErrorCode::InternalError => "InternalError",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 404 Not Found
            ErrorCode::BookNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,

            // 400 Bad Request
            ErrorCode::InvalidPageNumber
            | ErrorCode::InvalidPageSize
            | ErrorCode::InvalidInput
            | ErrorCode::InvalidQueryParameterValue
            | ErrorCode::MissingRequiredParameter
            | ErrorCode::InvalidFileReference
            | ErrorCode::InvalidBlobKey => StatusCode::BAD_REQUEST,

            // 413 Payload Too Large
            ErrorCode::RequestBodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 500 Internal Server Error
            ErrorCode::ContentMissing | ErrorCode::StorageFailure | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::BookNotFound => "The specified book does not exist.",
            ErrorCode::RouteNotFound => "The requested resource does not exist.",
            ErrorCode::InvalidPageNumber => "Invalid page number",
            ErrorCode::InvalidPageSize => "Page size must be a positive number of characters.",
            ErrorCode::InvalidFileReference => "Filename cannot be null",
            ErrorCode::InvalidBlobKey => "The specified blob key is not a valid relative path.",
            ErrorCode::MissingRequiredParameter => "A required parameter was not specified.",
            ErrorCode::InvalidQueryParameterValue => {
                "The value for one of the query parameters is not valid."
            }
            ErrorCode::RequestBodyTooLarge => "The request body is too large.",
            ErrorCode::ContentMissing => "The content referenced by the book could not be found.",
            ErrorCode::StorageFailure => "The content store failed to process the request.",
            ErrorCode::InternalError => "The server encountered an internal error.",
            _ => "An error occurred while processing the request.",
        }
    }

    /// Returns whether the caller can correct this error by changing the request.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Library error with code and message.
#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct LibraryError {
    pub code: ErrorCode,
    pub message: String,
    pub request_id: Option<String>,
}

impl LibraryError {
    /// Creates a new error with the given code and default message.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.default_message().to_string(),
            code,
            request_id: None,
        }
    }

    /// Creates a new error with a custom message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
        }
    }

    /// Shorthand for an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidInput, message)
    }

    /// Sets the request ID for this error.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    request_id: &'a str,
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let request_id = self
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        if self.code.is_client_error() {
            tracing::debug!(code = self.code.as_str(), request_id = %request_id, "{}", self.message);
        } else {
            tracing::error!(code = self.code.as_str(), request_id = %request_id, "{}", self.message);
        }

        let body = ErrorBody {
            code: self.code.as_str(),
            message: &self.message,
            request_id: &request_id,
        };
        let mut response = (status, Json(body)).into_response();

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        // Carry the message in the HTTP/1.1 status line as well
        if let Ok(reason) = ReasonPhrase::try_from(self.message.as_bytes()) {
            response.extensions_mut().insert(reason);
        }

        response
    }
}

/// Result type alias for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::BookNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InvalidPageNumber.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ContentMissing.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(ErrorCode::InvalidFileReference.is_client_error());
        assert!(!ErrorCode::StorageFailure.is_client_error());
    }

    #[test]
    fn test_error_response_carries_request_id() {
        let response = LibraryError::new(ErrorCode::BookNotFound)
            .with_request_id("req-1")
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-1");
    }
}
