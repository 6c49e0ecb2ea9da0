//! Book repository.
//!
//! The repository is the only path from the HTTP layer to storage.
//! Absence is reported as `Ok(None)`, never as an error.

use std::sync::Arc;

use serde_json::Value;

use crate::book::Book;
use crate::document::DocumentStore;
use crate::error::StoreError;

/// Persistence gateway for books.
pub trait BookRepository: Send + Sync {
    /// Looks up a book by identity.
    fn find_one(&self, id: &str) -> Result<Option<Book>, StoreError>;

    /// Returns every stored book.
    fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Stores a book, assigning an identity if it has none, and returns
    /// the stored value.
    fn save(&self, book: Book) -> Result<Book, StoreError>;

    /// Deletes a book. Deleting an unknown identity is a no-op.
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Number of stored books.
    fn count(&self) -> Result<usize, StoreError>;

    /// Whether a book with the given identity exists.
    fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.find_one(id)?.is_some())
    }
}

/// `BookRepository` backed by a `DocumentStore` collection.
#[derive(Debug, Clone)]
pub struct DocumentBookRepository {
    store: Arc<DocumentStore>,
}

impl DocumentBookRepository {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Underlying document store.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }
}

impl BookRepository for DocumentBookRepository {
    fn find_one(&self, id: &str) -> Result<Option<Book>, StoreError> {
        self.store.get(id)?.map(decode).transpose()
    }

    fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        self.store.all()?.into_iter().map(decode).collect()
    }

    fn save(&self, mut book: Book) -> Result<Book, StoreError> {
        let doc = serde_json::to_value(&book)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        let id = self.store.insert(doc)?;
        book.id = Some(id);
        Ok(book)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        if !self.store.remove(id)? {
            tracing::debug!("Delete of unknown book {} ignored", id);
        }
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.store.len()
    }

    fn exists(&self, id: &str) -> Result<bool, StoreError> {
        self.store.contains(id)
    }
}

fn decode(doc: Value) -> Result<Book, StoreError> {
    serde_json::from_value(doc)
        .map_err(|e| StoreError::SerializationError(format!("Invalid book document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repository() -> DocumentBookRepository {
        DocumentBookRepository::new(Arc::new(DocumentStore::in_memory("book")))
    }

    #[test]
    fn test_save_assigns_identity() {
        let repo = repository();
        let saved = repo.save(Book::new("Book1", "ISBN1", "Author1", 200)).unwrap();

        let id = saved.id().unwrap();
        let found = repo.find_one(id).unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[test]
    fn test_save_with_identity_updates_in_place() {
        let repo = repository();
        let mut book = repo.save(Book::new("Book1", "ISBN1", "Author1", 200)).unwrap();
        book.name = "Book2".to_string();
        let updated = repo.save(book.clone()).unwrap();

        assert_eq!(updated.id, book.id);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.find_all().unwrap()[0].name, "Book2");
    }

    #[test]
    fn test_find_missing_is_none() {
        let repo = repository();
        assert!(repo.find_one("nope").unwrap().is_none());
        assert!(!repo.exists("nope").unwrap());
    }

    #[test]
    fn test_delete() {
        let repo = repository();
        let book = repo.save(Book::new("Book1", "ISBN1", "Author1", 200)).unwrap();
        let id = book.id().unwrap();

        repo.delete(id).unwrap();
        assert!(repo.find_one(id).unwrap().is_none());
        // Second delete is a no-op
        repo.delete(id).unwrap();
    }

    #[test]
    fn test_undecodable_document() {
        let store = Arc::new(DocumentStore::in_memory("book"));
        let id = store.insert(json!({"name": "Book1", "pages": "many"})).unwrap();
        let repo = DocumentBookRepository::new(store);

        assert!(matches!(
            repo.find_one(&id),
            Err(StoreError::SerializationError(_))
        ));
    }
}
