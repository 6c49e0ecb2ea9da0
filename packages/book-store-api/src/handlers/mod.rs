//! HTTP endpoint implementations.

pub mod book_handlers;
pub mod request_utils;
pub mod response;

pub use book_handlers::{create_book, delete_book, get_book, list_books, update_book};
pub use response::{error_response, ErrorResponse};
