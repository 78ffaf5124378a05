//! Shelf domain models

pub mod book;
pub mod user;

// Re-export for convenience
pub use book::BookId;
pub use user::{LoginCredentials, NewUser, User, UserId};
