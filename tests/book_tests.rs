//! Book metadata operation tests.

mod common;

use common::{book_form, TestServer};
use diglib::{Book, BookPage, Config};
use serde_json::Value;

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_upload_and_get_book() {
    let server = TestServer::start().await;

    let client = reqwest::Client::new();
    let response = client
        .post(server.url("/books"))
        .multipart(book_form("Dune", "Frank Herbert", "Science Fiction", "9780441172719", "1965", "Spice."))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ID:1");

    let book: Book = reqwest::get(server.book_url(1)).await.unwrap().json().await.unwrap();
    assert_eq!(book.id, 1);
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author, "Frank Herbert");
    assert_eq!(book.year, 1965);

    // Generated name: title length + 5 alphanumerics + ".txt"
    let file_name = book.file_name.unwrap();
    assert_eq!(file_name.len(), "Dune".len() + 5 + ".txt".len());
    assert!(file_name.ends_with(".txt"));
}

#[tokio::test]
async fn test_get_missing_book() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.book_url(99)).await.unwrap();
    assert_eq!(response.status(), 404);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["code"], "BookNotFound");
    assert!(json["requestId"].is_string());
}

#[tokio::test]
async fn test_upload_rejects_invalid_fields() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let long_title = "t".repeat(101);
    let cases = [
        ("", "Author", "1234567890123", "2000"),
        (long_title.as_str(), "Author", "1234567890123", "2000"),
        ("Title", "", "1234567890123", "2000"),
        ("Title", "Author", "12345", "2000"),
        ("Title", "Author", "1234567890123", "-1"),
        ("Title", "Author", "1234567890123", "99999"),
        ("Title", "Author", "1234567890123", "nineteen"),
    ];

    for (title, author, isbn, year) in cases {
        let response = client
            .post(server.url("/books"))
            .multipart(book_form(title, author, "Drama", isbn, year, "text"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "{:?}", (title, author, isbn, year));
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["code"], "InvalidInput");
    }

    // Nothing was stored
    let page: BookPage = reqwest::get(server.url("/books")).await.unwrap().json().await.unwrap();
    assert_eq!(page.total_elements, 0);
}

#[tokio::test]
async fn test_upload_requires_every_field() {
    let server = TestServer::start().await;

    let form = reqwest::multipart::Form::new()
        .text("title", "No Content")
        .text("author", "Someone")
        .text("genre", "Drama")
        .text("isbn", "1234567890123")
        .text("year", "2001");
    let response = reqwest::Client::new()
        .post(server.url("/books"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["code"], "MissingRequiredParameter");
}

#[tokio::test]
async fn test_upload_rejects_non_utf8_content() {
    let server = TestServer::start().await;

    let form = reqwest::multipart::Form::new()
        .text("title", "Latin-1")
        .text("author", "Someone")
        .text("genre", "Drama")
        .text("isbn", "1234567890123")
        .text("year", "2001")
        .part(
            "content",
            reqwest::multipart::Part::bytes(vec![0x53, 0xe6, 0x6c, 0xff]).file_name("book.txt"),
        );
    let response = reqwest::Client::new()
        .post(server.url("/books"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["code"], "InvalidInput");

    let page: BookPage = reqwest::get(server.url("/books")).await.unwrap().json().await.unwrap();
    assert_eq!(page.total_elements, 0);
}

#[tokio::test]
async fn test_upload_too_large() {
    let config = Config {
        max_upload_size: 1024,
        ..Config::default()
    };
    let server = TestServer::start_with(config).await;

    let response = reqwest::Client::new()
        .post(server.url("/books"))
        .multipart(book_form("Big", "Author", "Drama", "1234567890123", "2000", &"b".repeat(4096)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 413);
}

#[tokio::test]
async fn test_delete_book() {
    let server = TestServer::start().await;
    let id = server.upload("Ephemeral", "Anon", "Drama", "gone soon").await;

    let client = reqwest::Client::new();
    let response = client.delete(server.book_url(id)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Book deleted successfully");

    let response = reqwest::get(server.book_url(id)).await.unwrap();
    assert_eq!(response.status(), 404);

    let response = client.delete(server.book_url(id)).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_list_books_sorting_and_paging() {
    let server = TestServer::start().await;
    for (title, author, genre) in [
        ("Emma", "Jane Austen", "Romance"),
        ("Beloved", "Toni Morrison", "Historical Fiction"),
        ("Dune", "Frank Herbert", "Science Fiction"),
        ("Anathem", "Neal Stephenson", "Science Fiction"),
    ] {
        server.upload(title, author, genre, "text").await;
    }

    let page: BookPage = reqwest::get(server.url("/books")).await.unwrap().json().await.unwrap();
    let titles: Vec<_> = page.content.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Anathem", "Beloved", "Dune", "Emma"]);
    assert_eq!(page.total_elements, 4);
    assert!(page.first && page.last);

    let page: BookPage = reqwest::get(server.url("/books?page=1&size=3&sortBy=title&sortDir=desc"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<_> = page.content.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Anathem"]);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.number, 1);
    assert!(page.last && !page.first);
}

#[tokio::test]
async fn test_list_books_filters() {
    let server = TestServer::start().await;
    server.upload("Dune", "Frank Herbert", "Science Fiction", "text").await;
    server.upload("Emma", "Jane Austen", "Romance", "text").await;
    server.upload("Anathem", "Neal Stephenson", "Science Fiction", "text").await;

    let page: BookPage = reqwest::get(server.url("/books?genre=science"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.total_elements, 2);

    // Title takes precedence over the other filters
    let page: BookPage = reqwest::get(server.url("/books?title=EMM&genre=science"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].title, "Emma");
}

#[tokio::test]
async fn test_list_books_rejects_bad_query() {
    let server = TestServer::start().await;

    for query in ["?size=0", "?page=-2", "?sortBy=colour"] {
        let response = reqwest::get(server.url(&format!("/books{}", query))).await.unwrap();
        assert_eq!(response.status(), 400, "query {}", query);
    }
}

#[tokio::test]
async fn test_genres() {
    let server = TestServer::start().await;

    let genres: Vec<String> = reqwest::get(server.url("/genres")).await.unwrap().json().await.unwrap();
    assert!(genres.contains(&"Fantasy".to_string()));
}

#[tokio::test]
async fn test_genres_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("GenreList.json");
    std::fs::write(&path, r#"["Saga","Eddic Poetry"]"#).unwrap();

    let config = Config {
        genres_file: Some(path.clone()),
        ..Config::default()
    };
    let server = TestServer::start_with(config).await;

    let genres: Vec<String> = reqwest::get(server.url("/genres")).await.unwrap().json().await.unwrap();
    assert_eq!(genres, ["Saga", "Eddic Poetry"]);

    std::fs::write(&path, "not json").unwrap();
    let response = reqwest::get(server.url("/genres")).await.unwrap();
    assert_eq!(response.status(), 500);
}
