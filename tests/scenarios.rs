use anyhow::Context;
use book_procurement::{
    book::BookDetails,
    error::{LibraryError, ValidationError},
    repository::BookRepository,
    service::BookService,
    status::BookStatus,
    transition::StatusTransitionValidator,
    utils,
};
use sled::open;
use std::sync::Arc;

use tempfile::{TempDir, tempdir}; // Use for test db cleanup.

// Sled uses file-based locking to prevent concurrent access, so every test
// opens its own database under a temp dir that is removed on drop.
fn open_db(name: &str) -> anyhow::Result<(TempDir, Arc<sled::Db>)> {
    let temp_dir = tempdir()?;
    let db = open(temp_dir.path().join(name))?;
    Ok((temp_dir, Arc::new(db)))
}

fn rust_book() -> BookDetails {
    BookDetails::new()
        .set_title("Programming Rust")
        .set_author("Jim Blandy")
        .set_isbn("978-1-4920-5259-3")
        .set_publisher("O'Reilly")
        .set_publication_year(2021)
}

#[test]
fn request_approve_and_receive() -> anyhow::Result<()> {
    let (_dir, db) = open_db("request_approve_and_receive.db")?;
    let service = BookService::new(db);
    let patron = utils::new_uuid_to_bech32(utils::USER_HRP)?;

    let book = service
        .request_book(rust_book(), patron.clone())
        .context("Book Failed on Request: ")?;

    assert_eq!(book.status, BookStatus::Requested);
    assert!(book.id.starts_with("book_1"));
    assert_eq!(book.requested_by, patron);
    assert_eq!(book.details.isbn(), Some("9781492052593"));

    let book = service
        .approve_purchase(&book.id)
        .context("Book Failed on Approval: ")?;
    assert_eq!(book.status, BookStatus::PendingPurchase);

    let book = service.receive_stock(&book.id)?;
    assert_eq!(book.status, BookStatus::InStock);

    // the stored copy reflects the last change
    assert_eq!(service.get_book(&book.id)?, book);
    assert!(service.allowed_transitions(&book.id)?.is_empty());

    Ok(())
}

#[test]
fn rejected_request_can_be_reconsidered() -> anyhow::Result<()> {
    let (_dir, db) = open_db("rejected_request.db")?;
    let service = BookService::new(db);

    let book = service.request_book(rust_book(), "user_a".into())?;
    let book = service.reject_request(&book.id)?;
    assert_eq!(book.status, BookStatus::Rejected);
    assert_eq!(
        service.allowed_transitions(&book.id)?,
        vec![BookStatus::PendingPurchase]
    );

    let book = service.approve_purchase(&book.id)?;
    assert_eq!(book.status, BookStatus::PendingPurchase);

    // and dropped again while waiting for purchase
    let book = service.reject_request(&book.id)?;
    assert_eq!(book.status, BookStatus::Rejected);

    Ok(())
}

#[test]
fn refused_transition_leaves_book_untouched() -> anyhow::Result<()> {
    let (_dir, db) = open_db("refused_transition.db")?;
    let service = BookService::new(db);

    let requested = service.request_book(rust_book(), "user_a".into())?;

    let err = service.receive_stock(&requested.id).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::InvalidStatusTransition {
            from: BookStatus::Requested,
            to: BookStatus::InStock,
        })
    );

    let stored = service.get_book(&requested.id)?;
    assert_eq!(stored, requested);

    Ok(())
}

#[test]
fn in_stock_is_final() -> anyhow::Result<()> {
    let (_dir, db) = open_db("in_stock_is_final.db")?;
    let service = BookService::new(db);

    let book = service.request_book(rust_book(), "user_a".into())?;
    service.approve_purchase(&book.id)?;
    let book = service.receive_stock(&book.id)?;

    for status in BookStatus::ALL {
        assert!(service.change_status(&book.id, status).is_err());
    }
    assert_eq!(service.get_book(&book.id)?.status, BookStatus::InStock);

    Ok(())
}

#[test]
fn unavailable_books_cannot_move() -> anyhow::Result<()> {
    let (_dir, db) = open_db("unavailable_books.db")?;

    // only reachable by writing the record directly
    let repository = BookRepository::new(db.clone());
    let book = book_procurement::book::Book::new_with_status(
        utils::new_book_id()?,
        rust_book().validate_and_finalise()?,
        "user_a".into(),
        BookStatus::CurrentlyUnavailable,
    );
    repository.save(&book)?;

    let service = BookService::new(db);
    assert!(service.approve_purchase(&book.id).is_err());
    assert!(service.allowed_transitions(&book.id)?.is_empty());
    assert_eq!(
        service.books_with_status(BookStatus::CurrentlyUnavailable)?,
        vec![book]
    );

    Ok(())
}

#[test]
fn unknown_book_is_reported() -> anyhow::Result<()> {
    let (_dir, db) = open_db("unknown_book.db")?;
    let service = BookService::new(db);

    let err = service.approve_purchase("book_missing").unwrap_err();
    assert_eq!(
        err.downcast_ref::<LibraryError>(),
        Some(&LibraryError::BookNotFound("book_missing".into()))
    );

    Ok(())
}

#[test]
fn invalid_details_are_not_stored() -> anyhow::Result<()> {
    let (_dir, db) = open_db("invalid_details.db")?;
    let service = BookService::new(db);

    let err = service
        .request_book(rust_book().set_isbn("12345"), "user_a".into())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::InvalidIsbn(_))
    ));

    for status in BookStatus::ALL {
        assert!(service.books_with_status(status)?.is_empty());
    }

    Ok(())
}

#[test]
fn books_are_listed_by_status() -> anyhow::Result<()> {
    let (_dir, db) = open_db("listed_by_status.db")?;
    let service = BookService::new(db);

    let first = service.request_book(rust_book(), "user_a".into())?;
    let second = service.request_book(
        rust_book().set_title("Rust Atomics and Locks"),
        "user_b".into(),
    )?;
    let _third = service.request_book(
        rust_book().set_title("Zero To Production"),
        "user_c".into(),
    )?;

    service.approve_purchase(&first.id)?;
    service.reject_request(&second.id)?;

    assert_eq!(service.books_with_status(BookStatus::Requested)?.len(), 1);
    assert_eq!(
        service.books_with_status(BookStatus::PendingPurchase)?[0].id,
        first.id
    );
    assert_eq!(
        service.books_with_status(BookStatus::Rejected)?[0].details.title(),
        Some("Rust Atomics and Locks")
    );

    Ok(())
}

#[test]
fn service_uses_injected_validator() -> anyhow::Result<()> {
    use book_procurement::transition::TransitionTable;
    use std::sync::LazyLock;

    // a policy that skips the purchase step entirely
    static DIRECT: LazyLock<TransitionTable> = LazyLock::new(|| {
        TransitionTable::from_edges([(BookStatus::Requested, vec![BookStatus::InStock])])
    });

    let (_dir, db) = open_db("injected_validator.db")?;
    let service = BookService::with_validator(db, StatusTransitionValidator::new(&DIRECT));

    let book = service.request_book(rust_book(), "user_a".into())?;
    assert!(service.approve_purchase(&book.id).is_err());

    let book = service.receive_stock(&book.id)?;
    assert_eq!(book.status, BookStatus::InStock);

    Ok(())
}
