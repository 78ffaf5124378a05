//! In-memory store used by handler tests

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{BookRepository, StoreError, StoreResult, UserRepository};
use crate::models::{BookId, NewUser, User, UserId};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    books: Vec<(BookId, UserId, String)>,
}

/// Both stores over shared vectors, with the same constraints as the schema
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count_with_email(&self, email: &str) -> usize {
        let tables = self.tables.lock().await;
        tables.users.iter().filter(|u| same_email(&u.email, email)).count()
    }

    pub async fn book_count(&self) -> usize {
        self.tables.lock().await.books.len()
    }
}

/// Mirrors the `lower(email)` unique index
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> StoreResult<UserId> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| same_email(&u.email, &new_user.email)) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = UserId(tables.users.len() as i64 + 1);
        tables.users.push(User {
            id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
        });
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| same_email(&u.email, email)).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn add(&self, user_id: UserId, title: &str) -> StoreResult<BookId> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::InvalidUser(user_id));
        }

        let id = BookId(tables.books.len() as i64 + 1);
        tables.books.push((id, user_id, title.to_string()));
        Ok(id)
    }

    async fn list_titles(&self, user_id: UserId) -> StoreResult<Vec<String>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .books
            .iter()
            .filter(|(_, owner, _)| *owner == user_id)
            .map(|(_, _, title)| title.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.create(&new_user("alice@example.com")).await.unwrap();

        let err = store.create(&new_user("alice@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.user_count_with_email("alice@example.com").await, 1);

        let err = store.create(&new_user("ALICE@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_books_require_existing_user() {
        let store = MemoryStore::new();
        let err = store.add(UserId(42), "Dune").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidUser(UserId(42))));
    }

    #[tokio::test]
    async fn test_titles_keep_insertion_order_per_user() {
        let store = MemoryStore::new();
        let alice = store.create(&new_user("alice@example.com")).await.unwrap();
        let bob = store.create(&new_user("bob@example.com")).await.unwrap();

        store.add(alice, "Dune").await.unwrap();
        store.add(bob, "Emma").await.unwrap();
        store.add(alice, "Anathem").await.unwrap();

        assert_eq!(store.list_titles(alice).await.unwrap(), vec!["Dune", "Anathem"]);
        assert_eq!(store.list_titles(bob).await.unwrap(), vec!["Emma"]);
    }
}
