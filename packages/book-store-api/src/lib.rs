//! REST API server for the book store.
//!
//! Provides HTTP endpoints for book CRUD operations and request routing.

pub mod handlers;
pub mod router;
pub mod server;
