//! Live-server tests for the book endpoints.
//!
//! Each test starts its own server on an ephemeral port and checks API
//! results against the repository directly.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};

use book_store_api::router::Router;
use book_store_api::server::Server;
use book_store_core::config::BookStoreConfig;
use book_store_core::document::DocumentStore;
use book_store_core::{Book, BookRepository, DocumentBookRepository};

struct TestServer {
    base_url: String,
    repository: Arc<DocumentBookRepository>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let repository = Arc::new(DocumentBookRepository::new(Arc::new(
            DocumentStore::in_memory("book"),
        )));
        let router = Router::new(repository.clone(), Arc::new(BookStoreConfig::default()));
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let server = Server::bind(addr, router).await.unwrap();
        let base_url = format!("http://{}/book", server.local_addr().unwrap());
        tokio::spawn(server.serve());

        Self {
            base_url,
            repository,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[tokio::test]
async fn test_can_fetch_all_when_empty() {
    let server = TestServer::start().await;

    let response = server.client.get(&server.base_url).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["totalBooks"], json!(0));
}

#[tokio::test]
async fn test_create_book_api() {
    let server = TestServer::start().await;

    let response = server
        .client
        .post(&server.base_url)
        .json(&json!({"name": "Book 1", "isbn": "QWER1234", "author": "Author 1", "pages": 200}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["message"], json!("Book created successfully"));
    let book_id = body["book"]["id"].as_str().unwrap();

    let from_store = server.repository.find_one(book_id).unwrap().unwrap();
    assert_eq!(from_store.name, "Book 1");
    assert_eq!(from_store.isbn, "QWER1234");
    assert_eq!(from_store.author, "Author 1");
    assert_eq!(from_store.pages, 200);

    server.repository.delete(book_id).unwrap();
}

#[tokio::test]
async fn test_get_book_details_api() {
    let server = TestServer::start().await;
    let book = server
        .repository
        .save(Book::new("Book1", "ISBN1", "Author1", 200))
        .unwrap();
    let book_id = book.id().unwrap();

    let response = server.client.get(server.url(book_id)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let from_api: Book = response.json().await.unwrap();

    assert_eq!(from_api, book);
}

#[tokio::test]
async fn test_update_book_details() {
    let server = TestServer::start().await;
    let book = server
        .repository
        .save(Book::new("Book1", "ISBN1", "Author1", 200))
        .unwrap();
    let book_id = book.id().unwrap();

    let request_body = json!({"name": "Book2", "isbn": "ISBN2", "author": "Author2", "pages": 200});
    let response = server
        .client
        .put(server.url(book_id))
        .json(&request_body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], json!("Book Updated successfully"));
    assert_eq!(body["book"]["id"], json!(book_id));

    let from_store = server.repository.find_one(book_id).unwrap().unwrap();
    assert_eq!(from_store.id(), Some(book_id));
    assert_eq!(from_store.name, "Book2");
    assert_eq!(from_store.isbn, "ISBN2");
    assert_eq!(from_store.author, "Author2");
    assert_eq!(from_store.pages, 200);
}

#[tokio::test]
async fn test_delete_book_api() {
    let server = TestServer::start().await;
    let book = server
        .repository
        .save(Book::new("Book1", "ISBN1", "Author1", 200))
        .unwrap();
    let book_id = book.id().unwrap();

    let response = server.client.delete(server.url(book_id)).send().await.unwrap();
    assert!(response.status().is_success());

    assert!(server.repository.find_one(book_id).unwrap().is_none());
    let response = server.client.get(server.url(book_id)).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_get_all_books_api() {
    let server = TestServer::start().await;
    let book1 = server
        .repository
        .save(Book::new("Book1", "ISBN1", "Author1", 200))
        .unwrap();
    let book2 = server
        .repository
        .save(Book::new("Book2", "ISBN2", "Author2", 200))
        .unwrap();

    let body: Value = server
        .client
        .get(&server.base_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["totalBooks"], json!(2));
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["id"], json!(book1.id().unwrap()));
    assert_eq!(books[1]["id"], json!(book2.id().unwrap()));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let server = TestServer::start().await;

    let response = server
        .client
        .post(&server.base_url)
        .header("Content-Type", "application/json")
        .body("{\"name\": \"Book 1\"")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("400"));
    assert_eq!(server.repository.count().unwrap(), 0);
}
