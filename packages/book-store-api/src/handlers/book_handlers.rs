//! Book CRUD handlers.

use std::fmt::Display;

use book_store_core::error::StoreError;
use book_store_core::{Book, BookFields};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};

use super::request_utils::{build_empty_response, json_response, read_json_body, with_repository};
use super::response::{BookList, BookMessage, BOOK_CREATED, BOOK_UPDATED};

/// Lists every book.
///
/// # Endpoint
/// `GET /book`
///
/// # Response
/// - **200 OK**
/// ```json
/// {
///   "totalBooks": 1,
///   "books": [{"id": "5f0c...", "name": "Book 1", "isbn": "QWER1234", "author": "Author 1", "pages": 200}]
/// }
/// ```
pub async fn list_books(state: AppState) -> Result<Response<Bytes>, RouterError> {
    let books = with_repository(&state, |repo| repo.find_all()).await?;
    json_response(200, &BookList::from(books))
}

/// Returns one book as plain JSON.
///
/// # Endpoint
/// `GET /book/{id}`
///
/// # Errors
/// - **404 Not Found**: No book with that id
pub async fn get_book(id: String, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let book = with_repository(&state, move |repo| {
        repo.find_one(&id)?.ok_or(StoreError::BookNotFound { id })
    })
    .await?;
    json_response(200, &book)
}

/// Creates a book.
///
/// # Endpoint
/// `POST /book`
///
/// # Request Body
/// ```json
/// {"name": "Book 1", "isbn": "QWER1234", "author": "Author 1", "pages": 200}
/// ```
///
/// # Response
/// - **200 OK**: `{"message": "Book created successfully", "book": {...}}`
///
/// # Errors
/// - **400 Bad Request**: Body is not valid JSON or lacks a field
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8989/book \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Book 1", "isbn": "QWER1234", "author": "Author 1", "pages": 200}'
/// ```
pub async fn create_book<B>(req: Request<B>, state: AppState) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let fields: BookFields = read_json_body(req, state.config.request_timeout_ms).await?;

    let book = with_repository(&state, move |repo| repo.save(Book::from(fields))).await?;
    tracing::info!("Created book {}", book.id().unwrap_or_default());

    json_response(
        200,
        &BookMessage {
            message: BOOK_CREATED,
            book,
        },
    )
}

/// Replaces every field of a book except its id.
///
/// # Endpoint
/// `PUT /book/{id}`
///
/// # Response
/// - **200 OK**: `{"message": "Book Updated successfully", "book": {...}}`
///
/// # Errors
/// - **400 Bad Request**: Body is not valid JSON or lacks a field
/// - **404 Not Found**: No book with that id
pub async fn update_book<B>(
    id: String,
    req: Request<B>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let fields: BookFields = read_json_body(req, state.config.request_timeout_ms).await?;

    let book = with_repository(&state, move |repo| {
        let mut book = repo
            .find_one(&id)?
            .ok_or(StoreError::BookNotFound { id })?;
        book.apply(fields);
        repo.save(book)
    })
    .await?;
    tracing::info!("Updated book {}", book.id().unwrap_or_default());

    json_response(
        200,
        &BookMessage {
            message: BOOK_UPDATED,
            book,
        },
    )
}

/// Deletes a book.
///
/// # Endpoint
/// `DELETE /book/{id}`
///
/// # Response
/// - **204 No Content**, whether or not the book existed
pub async fn delete_book(id: String, state: AppState) -> Result<Response<Bytes>, RouterError> {
    with_repository(&state, move |repo| repo.delete(&id)).await?;
    build_empty_response(204)
}
