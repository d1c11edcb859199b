//! Procurement lifecycle of a book
use super::error::LibraryError;
use std::fmt;
use std::str::FromStr;

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum BookStatus {
    #[n(0)]
    Requested,
    #[n(1)]
    PendingPurchase,
    #[n(2)]
    Rejected,
    #[n(3)]
    InStock,
    #[n(4)]
    CurrentlyUnavailable,
}

impl BookStatus {
    pub const ALL: [BookStatus; 5] = [
        BookStatus::Requested,
        BookStatus::PendingPurchase,
        BookStatus::Rejected,
        BookStatus::InStock,
        BookStatus::CurrentlyUnavailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Requested => "REQUESTED",
            BookStatus::PendingPurchase => "PENDING_PURCHASE",
            BookStatus::Rejected => "REJECTED",
            BookStatus::InStock => "IN_STOCK",
            BookStatus::CurrentlyUnavailable => "CURRENTLY_UNAVAILABLE",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LibraryError::UnknownStatus(s.to_string()))
    }
}
