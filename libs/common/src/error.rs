//! Failures while preparing the database
//!
//! Constraint violations during normal queries are not represented here; the
//! service that owns the tables classifies those itself.

use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// `DATABASE_*` variables missing, unparsable or contradictory
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// The pool could not open its initial connections
    #[error("Could not connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Could not apply migrations: {0}")]
    Migration(#[source] MigrateError),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
