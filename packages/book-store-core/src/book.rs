//! Book entity.

use serde::{Deserialize, Serialize};

/// A book record.
///
/// `id` is absent until the book is first saved; the document store
/// assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub isbn: String,
    pub author: String,
    pub pages: i32,
}

impl Book {
    /// Creates an unsaved book.
    pub fn new(
        name: impl Into<String>,
        isbn: impl Into<String>,
        author: impl Into<String>,
        pages: i32,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            isbn: isbn.into(),
            author: author.into(),
            pages,
        }
    }

    /// Returns the book with the given identity.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Identity, if the book has been saved.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Replaces every mutable field. Identity is left untouched.
    pub fn apply(&mut self, fields: BookFields) {
        self.name = fields.name;
        self.isbn = fields.isbn;
        self.author = fields.author;
        self.pages = fields.pages;
    }
}

/// Mutable book fields, as sent in create and update request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub name: String,
    pub isbn: String,
    pub author: String,
    pub pages: i32,
}

impl From<BookFields> for Book {
    fn from(fields: BookFields) -> Self {
        Book::new(fields.name, fields.isbn, fields.author, fields.pages)
    }
}
