//! Common test utilities.

#![allow(dead_code)]

use tokio::net::TcpListener;

use diglib::{Config, LibraryServer};

/// Test server wrapper.
pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Creates and starts a test server on a random port.
    pub async fn start() -> Self {
        Self::start_with(Config::default()).await
    }

    /// Starts a test server with the given configuration on a random port.
    pub async fn start_with(config: Config) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = Config {
            host: "127.0.0.1".to_string(),
            port,
            ..config
        };
        let base_url = format!("http://127.0.0.1:{}", port);

        let server = LibraryServer::from_config(config).await.unwrap();

        // Start server in background
        tokio::spawn(async move {
            server.run_on(listener).await.unwrap();
        });

        Self { base_url }
    }

    /// Returns the URL for a path below the service root.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the URL for a book.
    pub fn book_url(&self, id: u64) -> String {
        format!("{}/books/{}", self.base_url, id)
    }

    /// Returns the URL for a page of a book's content.
    pub fn content_url(&self, id: u64, query: &str) -> String {
        format!("{}/books/{}/content{}", self.base_url, id, query)
    }

    /// Uploads a book through the multipart form and returns its ID.
    pub async fn upload(&self, title: &str, author: &str, genre: &str, text: &str) -> u64 {
        let response = reqwest::Client::new()
            .post(self.url("/books"))
            .multipart(book_form(title, author, genre, "9780000000001", "1999", text))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body = response.text().await.unwrap();
        body.strip_prefix("ID:").unwrap().parse().unwrap()
    }
}

/// Builds an upload form with every field present.
pub fn book_form(
    title: &str,
    author: &str,
    genre: &str,
    isbn: &str,
    year: &str,
    text: &str,
) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("title", title.to_string())
        .text("author", author.to_string())
        .text("genre", genre.to_string())
        .text("isbn", isbn.to_string())
        .text("year", year.to_string())
        .part(
            "content",
            reqwest::multipart::Part::bytes(text.as_bytes().to_vec()).file_name("book.txt"),
        )
}
