//! Which procurement status changes are legal
use super::error::ValidationError;
use super::status::BookStatus;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Directed graph of allowed status changes. Absent and empty entries both
/// mean the source has no outgoing transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    edges: HashMap<BookStatus, Vec<BookStatus>>,
}

static CANONICAL: LazyLock<TransitionTable> = LazyLock::new(|| {
    use BookStatus::*;

    TransitionTable::from_edges([
        (Requested, vec![Rejected, PendingPurchase]),
        (Rejected, vec![PendingPurchase]),
        (PendingPurchase, vec![Rejected, InStock]),
        // procurement ends here
        (InStock, vec![]),
        (CurrentlyUnavailable, vec![]),
    ])
});

impl TransitionTable {
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (BookStatus, Vec<BookStatus>)>,
    {
        let mut table = Self::default();
        for (source, destinations) in edges {
            let entry = table.edges.entry(source).or_default();
            for destination in destinations {
                if !entry.contains(&destination) {
                    entry.push(destination);
                }
            }
        }
        table
    }

    /// The table every service uses unless told otherwise. Built on first use.
    pub fn canonical() -> &'static TransitionTable {
        &CANONICAL
    }

    pub fn destinations(&self, source: BookStatus) -> &[BookStatus] {
        self.edges.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn permits(&self, from: BookStatus, to: BookStatus) -> bool {
        self.destinations(from).contains(&to)
    }
}

/// Answers "may a book move from `current` to `new`?" against a table it
/// borrows. Does not perform the change.
#[derive(Debug, Clone, Copy)]
pub struct StatusTransitionValidator<'t> {
    table: &'t TransitionTable,
}

impl StatusTransitionValidator<'static> {
    pub fn canonical() -> Self {
        Self::new(TransitionTable::canonical())
    }
}

impl Default for StatusTransitionValidator<'static> {
    fn default() -> Self {
        Self::canonical()
    }
}

impl<'t> StatusTransitionValidator<'t> {
    pub fn new(table: &'t TransitionTable) -> Self {
        Self { table }
    }

    pub fn is_valid(&self, current: BookStatus, new: BookStatus) -> bool {
        self.table.permits(current, new)
    }

    /// Same verdict as [`Self::is_valid`], as an error callers can propagate.
    pub fn check(&self, current: BookStatus, new: BookStatus) -> Result<(), ValidationError> {
        if self.is_valid(current, new) {
            Ok(())
        } else {
            Err(ValidationError::InvalidStatusTransition {
                from: current,
                to: new,
            })
        }
    }

    pub fn allowed_transitions(&self, current: BookStatus) -> Vec<BookStatus> {
        self.table.destinations(current).to_vec()
    }
}
