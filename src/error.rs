use super::status::BookStatus;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Status change from {from} to {to} is not permitted")]
    InvalidStatusTransition { from: BookStatus, to: BookStatus },
    #[error("Book details are missing the {0}")]
    MissingField(&'static str),
    #[error("'{0}' is not a 10 or 13 digit ISBN")]
    InvalidIsbn(String),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LibraryError {
    #[error("No book with id {0}")]
    BookNotFound(String),
    #[error("Unknown book status '{0}'")]
    UnknownStatus(String),
    #[error("Failed to encode book: {0}")]
    Encoding(String),
    #[error("Failed to decode book: {0}")]
    Decoding(String),
}
