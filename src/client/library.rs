//! HTTP client for the library REST API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

use crate::models::{Book, BookPage, BookQuery, NewBook, PagedContent};

use super::error::{ClientError, ClientResult};
use super::export::write_book_file;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Source of book pages, implemented by the HTTP client.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches page `page` of book `book_id`. `page_size` of `None` lets the
    /// server pick its default.
    async fn fetch_page(
        &self,
        book_id: u64,
        page: usize,
        page_size: Option<usize>,
    ) -> ClientResult<PagedContent>;
}

/// Reads every page of a book in order, each page exactly once.
///
/// Page 0 is fetched first to learn the page count. Any failure aborts the
/// whole read and no partial result is returned.
pub async fn read_all_pages<S: PageSource + ?Sized>(
    source: &S,
    book_id: u64,
    page_size: Option<usize>,
) -> ClientResult<Vec<PagedContent>> {
    let first = source.fetch_page(book_id, 0, page_size).await?;
    let total_pages = first.total_pages();

    let mut pages = Vec::with_capacity(total_pages.max(1));
    pages.push(first);
    for page in 1..total_pages {
        pages.push(source.fetch_page(book_id, page, page_size).await?);
    }

    debug!(book_id, pages = pages.len(), "Read all pages");
    Ok(pages)
}

/// Client for the library REST API.
#[derive(Debug, Clone)]
pub struct LibraryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LibraryClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Creates a client that sends requests through `http`.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for `segments` below the base URL.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Lists books matching `query`.
    pub async fn list_books(&self, query: &BookQuery) -> ClientResult<BookPage> {
        let url = self.endpoint(&["books"])?;
        let response = self.http.get(url).query(&query.to_params()).send().await?;
        json_body(response).await
    }

    pub async fn get_book(&self, id: u64) -> ClientResult<Book> {
        let url = self.endpoint(&["books", &id.to_string()])?;
        let response = self.http.get(url).send().await?;
        json_body(response).await
    }

    /// Uploads a new book with the text read from `content_path`. Returns the new ID.
    pub async fn post_book(&self, book: &NewBook, content_path: &Path) -> ClientResult<u64> {
        let data = tokio::fs::read(content_path).await?;
        let file_name = content_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "content.txt".to_string());

        let content = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime::TEXT_PLAIN_UTF_8.as_ref())?;
        let form = Form::new()
            .text("title", book.title.clone())
            .text("author", book.author.clone())
            .text("genre", book.genre.clone())
            .text("isbn", book.isbn.clone())
            .text("year", book.year.to_string())
            .part("content", content);

        let url = self.endpoint(&["books"])?;
        let response = self.http.post(url).multipart(form).send().await?;
        let body = check_status(response).await?.text().await?;

        let id = parse_created_id(&body)?;
        info!(id, title = %book.title, "Uploaded book");
        Ok(id)
    }

    /// Deletes a book. Returns `false` when the book did not exist.
    pub async fn delete_book(&self, id: u64) -> ClientResult<bool> {
        let url = self.endpoint(&["books", &id.to_string()])?;
        let response = self.http.delete(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    pub async fn genres(&self) -> ClientResult<Vec<String>> {
        let url = self.endpoint(&["genres"])?;
        let response = self.http.get(url).send().await?;
        json_body(response).await
    }

    /// Reads one page of a book's text.
    pub async fn read_page(
        &self,
        book_id: u64,
        page: usize,
        page_size: Option<usize>,
    ) -> ClientResult<PagedContent> {
        let url = self.endpoint(&["books", &book_id.to_string(), "content"])?;
        let mut params = vec![("page", page.to_string())];
        if let Some(size) = page_size {
            params.push(("pageSize", size.to_string()));
        }
        let response = self.http.get(url).query(&params).send().await?;
        json_body(response).await
    }

    /// Reads every page of `book`.
    pub async fn read_all_pages(
        &self,
        book: &Book,
        page_size: Option<usize>,
    ) -> ClientResult<Vec<PagedContent>> {
        read_all_pages(self, book.id, page_size).await
    }

    /// Downloads the whole text of `book` into `dir`. Returns the written path.
    pub async fn download_book(
        &self,
        book: &Book,
        dir: &Path,
        page_size: Option<usize>,
    ) -> ClientResult<PathBuf> {
        let pages = self.read_all_pages(book, page_size).await?;
        write_book_file(book, dir, &pages).await
    }
}

#[async_trait]
impl PageSource for LibraryClient {
    async fn fetch_page(
        &self,
        book_id: u64,
        page: usize,
        page_size: Option<usize>,
    ) -> ClientResult<PagedContent> {
        self.read_page(book_id, page, page_size).await
    }
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

async fn json_body<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Parses the `ID:<id>` body returned by a successful upload.
fn parse_created_id(body: &str) -> ClientResult<u64> {
    body.trim()
        .strip_prefix("ID:")
        .and_then(|id| id.trim().parse().ok())
        .ok_or_else(|| ClientError::UnexpectedResponse(format!("expected 'ID:<id>', got '{}'", body)))
}
