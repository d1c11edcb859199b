//! Service layer API for book procurement operations
use super::book::{Book, BookDetails};
use super::error::LibraryError;
use super::repository::BookRepository;
use super::status::BookStatus;
use super::transition::StatusTransitionValidator;
use super::utils;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct BookService {
    repository: BookRepository,
    validator: StatusTransitionValidator<'static>,
}

impl BookService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self::with_validator(instance, StatusTransitionValidator::canonical())
    }

    pub fn with_validator(
        instance: Arc<sled::Db>,
        validator: StatusTransitionValidator<'static>,
    ) -> Self {
        Self {
            repository: BookRepository::new(instance),
            validator,
        }
    }

    /// Load a book, a missing record is an error here
    pub fn get_book(&self, book_id: &str) -> anyhow::Result<Book> {
        self.repository
            .load(book_id)?
            .ok_or_else(|| LibraryError::BookNotFound(book_id.to_string()).into())
    }

    /// Record a patron's request for a new book
    pub fn request_book(&self, details: BookDetails, requested_by: String) -> anyhow::Result<Book> {
        let details = details.validate_and_finalise()?;
        let book = Book::new(utils::new_book_id()?, details, requested_by);

        self.repository.save(&book)?;
        info!(
            book_id = %book.id,
            requested_by = %book.requested_by,
            "book requested"
        );

        Ok(book)
    }

    /// Move a book to `new_status` if the transition table allows it.
    /// Nothing is written when the change is refused.
    pub fn change_status(&self, book_id: &str, new_status: BookStatus) -> anyhow::Result<Book> {
        let mut book = self.get_book(book_id)?;
        let current = book.status;

        if let Err(refused) = self.validator.check(current, new_status) {
            warn!(%book_id, from = %current, to = %new_status, "status change refused");
            return Err(refused.into());
        }

        book.set_status(new_status);
        self.repository.save(&book)?;
        debug!(%book_id, from = %current, to = %new_status, "status changed");

        Ok(book)
    }

    /// Accept a request, the book is now waiting to be bought
    pub fn approve_purchase(&self, book_id: &str) -> anyhow::Result<Book> {
        self.change_status(book_id, BookStatus::PendingPurchase)
    }

    pub fn reject_request(&self, book_id: &str) -> anyhow::Result<Book> {
        self.change_status(book_id, BookStatus::Rejected)
    }

    /// The purchased copy has arrived
    pub fn receive_stock(&self, book_id: &str) -> anyhow::Result<Book> {
        self.change_status(book_id, BookStatus::InStock)
    }

    pub fn books_with_status(&self, status: BookStatus) -> anyhow::Result<Vec<Book>> {
        Ok(self
            .repository
            .list()?
            .into_iter()
            .filter(|book| book.status == status)
            .collect())
    }

    pub fn allowed_transitions(&self, book_id: &str) -> anyhow::Result<Vec<BookStatus>> {
        let book = self.get_book(book_id)?;
        Ok(self.validator.allowed_transitions(book.status))
    }
}
