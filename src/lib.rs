pub mod book;
pub mod error;
pub mod repository;
pub mod service;
pub mod status;
pub mod transition;
pub mod utils;

pub use status::BookStatus;
pub use transition::{StatusTransitionValidator, TransitionTable};
