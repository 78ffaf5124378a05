//! Book model

use serde::{Deserialize, Serialize};

/// Database identifier of a book entry
///
/// Books are only ever listed by title, so the row itself has no model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct BookId(pub i64);
