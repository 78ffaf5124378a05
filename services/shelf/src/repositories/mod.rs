//! Storage seams for users and books
//!
//! Handlers only see the [`UserRepository`] and [`BookRepository`] traits;
//! the PostgreSQL implementations live in the submodules.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{BookId, NewUser, User, UserId};

pub mod book;
#[cfg(test)]
pub mod memory;
pub mod user;

pub use book::PgBookRepository;
pub use user::PgUserRepository;

/// Errors raised by the stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// The unique index on `lower(users.email)` rejected the insert
    #[error("Email address is already registered")]
    DuplicateEmail,

    /// The foreign key on `books.user_id` rejected the insert
    #[error("User {0} does not exist")]
    InvalidUser(UserId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence of user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with [`StoreError::DuplicateEmail`] when the
    /// email is already taken
    async fn create(&self, new_user: &NewUser) -> StoreResult<UserId>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;
}

/// Persistence of per-user book lists
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Record a title for `user_id`; fails with [`StoreError::InvalidUser`]
    /// when the user does not exist
    async fn add(&self, user_id: UserId, title: &str) -> StoreResult<BookId>;

    /// All titles of `user_id` in insertion order
    async fn list_titles(&self, user_id: UserId) -> StoreResult<Vec<String>>;
}
