//! Response envelopes for HTTP endpoints.

use book_store_core::Book;
use serde::Serialize;

/// Message sent after a successful create.
pub const BOOK_CREATED: &str = "Book created successfully";

/// Message sent after a successful update.
pub const BOOK_UPDATED: &str = "Book Updated successfully";

/// Envelope pairing a status message with the affected book.
#[derive(Debug, Serialize)]
pub struct BookMessage {
    pub message: &'static str,
    pub book: Book,
}

/// Envelope for the book listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookList {
    pub total_books: usize,
    pub books: Vec<Book>,
}

impl From<Vec<Book>> for BookList {
    fn from(books: Vec<Book>) -> Self {
        Self {
            total_books: books.len(),
            books,
        }
    }
}

/// Consistent API error response wrapper
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error code (HTTP status code as string)
    pub code: String,
    /// Error message
    pub message: String,
    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Consistent error response wrapper
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false for error responses
    pub success: bool,
    /// Error information
    pub error: ApiError,
}

/// Helper to create error response
pub fn error_response(code: u16, message: String, details: Option<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message,
            details,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_list_envelope() {
        let list = BookList::from(vec![Book::new("Book1", "ISBN1", "Author1", 200).with_id("a")]);
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["totalBooks"], json!(1));
        assert_eq!(value["books"][0]["id"], json!("a"));
    }

    #[test]
    fn test_error_envelope_omits_empty_details() {
        let value = serde_json::to_value(error_response(404, "Not Found".to_string(), None)).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "error": {"code": "404", "message": "Not Found"}})
        );
    }
}
