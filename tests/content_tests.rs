//! Paged content retrieval tests.

mod common;

use common::TestServer;
use diglib::{Config, PagedContent};
use serde_json::Value;

#[tokio::test]
async fn test_pages_of_twenty_characters() {
    let server = TestServer::start().await;
    let text = "abcdefghij".repeat(10);
    let id = server.upload("Ten Times", "Anon", "Poetry", &text).await;

    let client = reqwest::Client::new();
    for page in 0..5 {
        let response = client
            .get(server.content_url(id, &format!("?page={}&pageSize=20", page)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["pageNumber"], page);
        assert_eq!(json["totalPages"], 5);
        assert_eq!(json["pageSize"], 20);
        assert_eq!(json["totalSize"], 100);
        assert_eq!(json["readingTime"], "0 hours, 0 minutes");
    }

    let response = client
        .get(server.content_url(id, "?page=5&pageSize=20"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["code"], "InvalidPageNumber");
}

#[tokio::test]
async fn test_single_exact_page() {
    let server = TestServer::start().await;
    let id = server
        .upload("Digits", "Anon", "Poetry", "12345678901234567890")
        .await;

    let page: PagedContent = reqwest::get(server.content_url(id, "?page=0&pageSize=20"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.content(), "12345678901234567890");
    assert_eq!(page.total_pages(), 1);
    assert_eq!(page.page_size(), 20);
}

#[tokio::test]
async fn test_default_page_size_applies() {
    let config = Config {
        default_page_size: 30,
        ..Config::default()
    };
    let server = TestServer::start_with(config).await;
    let id = server.upload("Long", "Anon", "Drama", &"x".repeat(95)).await;

    let page: PagedContent = reqwest::get(server.content_url(id, ""))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.page_number(), 0);
    assert_eq!(page.page_size(), 30);
    assert_eq!(page.total_pages(), 4);
}

#[tokio::test]
async fn test_reading_time_covers_whole_document() {
    let server = TestServer::start().await;
    let id = server.upload("Tome", "Anon", "Classic", &"w".repeat(100_000)).await;

    let json: Value = reqwest::get(server.content_url(id, "?page=99"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["totalPages"], 100);
    assert_eq!(json["readingTime"], "1 hours, 49 minutes");
}

#[tokio::test]
async fn test_multibyte_text_is_paged_by_character() {
    let server = TestServer::start().await;
    let text = "Þórður fór á sjó 🌊 og veiddi þorsk.";
    let id = server.upload("Sjór", "Anon", "Short Stories", text).await;

    let mut rebuilt = String::new();
    for page in 0..5 {
        let page: PagedContent = reqwest::get(server.content_url(id, &format!("?page={}&pageSize=8", page)))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(page.total_size(), text.chars().count());
        rebuilt.push_str(page.content());
    }
    assert_eq!(rebuilt, text);
}

#[tokio::test]
async fn test_empty_book_has_one_page() {
    let server = TestServer::start().await;
    let id = server.upload("Blank", "Anon", "Poetry", "").await;

    let page: PagedContent = reqwest::get(server.content_url(id, ""))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.total_pages(), 1);
    assert_eq!(page.content(), "");

    let response = reqwest::get(server.content_url(id, "?page=1")).await.unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_invalid_page_parameters() {
    let server = TestServer::start().await;
    let id = server.upload("Short", "Anon", "Poetry", "some text").await;

    for (query, code) in [
        ("?page=-1", "InvalidPageNumber"),
        ("?pageSize=0", "InvalidPageSize"),
        ("?pageSize=-3", "InvalidPageSize"),
        ("?page=abc", "InvalidQueryParameterValue"),
    ] {
        let response = reqwest::get(server.content_url(id, query)).await.unwrap();
        assert_eq!(response.status(), 400, "query {}", query);
        assert!(response.headers().contains_key("x-request-id"));
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["code"], code, "query {}", query);
    }
}

#[tokio::test]
async fn test_content_of_missing_book() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.content_url(404, "")).await.unwrap();
    assert_eq!(response.status(), 404);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["code"], "BookNotFound");
}

#[tokio::test]
async fn test_missing_blob_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        location: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let server = TestServer::start_with(config).await;
    let id = server.upload("Vanishing", "Anon", "Mystery", "now you see me").await;

    // Remove the stored text behind the service's back
    let content_dir = dir.path().join("bookcontents");
    for entry in std::fs::read_dir(&content_dir).unwrap() {
        std::fs::remove_file(entry.unwrap().path()).unwrap();
    }

    let response = reqwest::get(server.content_url(id, "")).await.unwrap();
    assert_eq!(response.status(), 500);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["code"], "ContentMissing");
}
