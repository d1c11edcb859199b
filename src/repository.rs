//! sled-backed storage for book records
use super::book::Book;
use super::error::LibraryError;
use std::sync::Arc;

pub struct BookRepository {
    instance: Arc<sled::Db>,
}

impl BookRepository {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    /// Insert or overwrite the record stored under `book.id`
    pub fn save(&self, book: &Book) -> anyhow::Result<()> {
        let encoded =
            minicbor::to_vec(book).map_err(|e| LibraryError::Encoding(e.to_string()))?;
        self.instance.insert(book.id.as_bytes(), encoded)?;
        Ok(())
    }

    pub fn load(&self, book_id: &str) -> anyhow::Result<Option<Book>> {
        match self.instance.get(book_id.as_bytes())? {
            Some(bytes) => Ok(Some(decode_book(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Every stored book, in key order
    pub fn list(&self) -> anyhow::Result<Vec<Book>> {
        self.instance
            .iter()
            .map(|entry| -> anyhow::Result<Book> {
                let (_, bytes) = entry?;
                Ok(decode_book(&bytes)?)
            })
            .collect()
    }

    pub fn remove(&self, book_id: &str) -> anyhow::Result<bool> {
        Ok(self.instance.remove(book_id.as_bytes())?.is_some())
    }
}

fn decode_book(bytes: &[u8]) -> Result<Book, LibraryError> {
    minicbor::decode(bytes).map_err(|e| LibraryError::Decoding(e.to_string()))
}
