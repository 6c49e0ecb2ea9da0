//! Core storage layer for the book store service.
//!
//! Provides the book entity, a JSON document store with optional
//! on-disk snapshots, and the repository gateway used by the API.

pub mod book;
pub mod config;
pub mod document;
pub mod error;
pub mod repository;

pub use book::{Book, BookFields};
pub use repository::{BookRepository, DocumentBookRepository};
