//! PostgreSQL book repository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::{BookRepository, StoreError, StoreResult};
use crate::models::{BookId, UserId};

/// Book repository backed by the `books` table
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    /// Create a new book repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn add(&self, user_id: UserId, title: &str) -> StoreResult<BookId> {
        info!("Adding book for user: {}", user_id);

        let id = sqlx::query_scalar::<_, BookId>(
            r#"
            INSERT INTO books (user_id, title)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_foreign_key_violation()) {
                StoreError::InvalidUser(user_id)
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(id)
    }

    async fn list_titles(&self, user_id: UserId) -> StoreResult<Vec<String>> {
        let titles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT title
            FROM books
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(titles)
    }
}
