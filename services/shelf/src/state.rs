//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    assistant::Assistant,
    repositories::{BookRepository, PgBookRepository, PgUserRepository, UserRepository},
    session::SessionManager,
};

/// Application state shared across handlers
///
/// Built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: Arc<dyn UserRepository>,
    pub book_repository: Arc<dyn BookRepository>,
    pub sessions: SessionManager,
    pub assistant: Arc<dyn Assistant>,
}

impl AppState {
    /// State backed by PostgreSQL repositories on `pool`
    pub fn new(pool: PgPool, sessions: SessionManager, assistant: Box<dyn Assistant>) -> Self {
        Self {
            user_repository: Arc::new(PgUserRepository::new(pool.clone())),
            book_repository: Arc::new(PgBookRepository::new(pool.clone())),
            db_pool: pool,
            sessions,
            assistant: Arc::from(assistant),
        }
    }
}
