//! Identifier helpers

use bech32::Bech32m;
use uuid7::uuid7;

pub const BOOK_HRP: &str = "book_";
pub const USER_HRP: &str = "user_";

// construct a unique id from a fresh uuid7 then encode using bech32m
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

pub fn new_book_id() -> anyhow::Result<String> {
    new_uuid_to_bech32(BOOK_HRP)
}
