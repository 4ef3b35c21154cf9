//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserChanges, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<UserId, User>,
    /// Lowercased email -> user ID
    email_index: BTreeMap<String, UserId>,
    last_id: i64,
}

/// In-memory implementation of UserRepository
///
/// Ids are assigned sequentially from 1 and never reused.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_key(email: &str) -> String {
    email.to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn create(&self, data: NewUser) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;
        let email = email_key(&data.email);

        if inner.email_index.contains_key(&email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                data.email
            )));
        }

        inner.last_id += 1;
        let user = User::from_new(UserId::new(inner.last_id), data);

        inner.email_index.insert(email, user.id());
        inner.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let old_email = match inner.users.get(&id) {
            Some(user) => email_key(user.email()),
            None => return Err(DomainError::not_found(format!("User '{}' not found", id))),
        };

        // If email changed, check uniqueness and update index
        if let Some(new_email) = &changes.email {
            let new_key = email_key(new_email);

            if new_key != old_email {
                if inner.email_index.contains_key(&new_key) {
                    return Err(DomainError::conflict(format!(
                        "Email '{}' already exists",
                        new_email
                    )));
                }

                inner.email_index.remove(&old_email);
                inner.email_index.insert(new_key, id);
            }
        }

        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;
        user.apply(changes);

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        if let Some(user) = inner.users.remove(&id) {
            inner.email_index.remove(&email_key(user.email()));
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserType;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone_number: None,
            user_type: UserType::Passenger,
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(new_user("a@example.com")).await.unwrap();
        let b = repo.create(new_user("b@example.com")).await.unwrap();

        assert_eq!(a.id(), UserId::new(1));
        assert_eq!(b.id(), UserId::new(2));
    }

    #[tokio::test]
    async fn test_ping_succeeds() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com")).await.unwrap();

        assert!(repo.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(new_user("a@example.com")).await.unwrap();
        assert!(repo.delete(a.id()).await.unwrap());

        let b = repo.create(new_user("a@example.com")).await.unwrap();
        assert_eq!(b.id(), UserId::new(2));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();

        repo.create(new_user("a@example.com")).await.unwrap();
        let result = repo.create(new_user("A@Example.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = InMemoryUserRepository::new();

        for i in 0..5 {
            repo.create(new_user(&format!("u{}@example.com", i)))
                .await
                .unwrap();
        }

        let ids: Vec<i64> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|u| u.id().value())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryUserRepository::new();

        let result = repo.update(UserId::new(9), &UserChanges::default()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_email_reindexes() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@example.com")).await.unwrap();

        let changes = UserChanges {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let updated = repo.update(a.id(), &changes).await.unwrap();
        assert_eq!(updated.email(), "new@example.com");

        // Old email is free again
        repo.create(new_user("a@example.com")).await.unwrap();

        let clash = repo.create(new_user("new@example.com")).await;
        assert!(matches!(clash, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let repo = InMemoryUserRepository::new();
        assert!(!repo.delete(UserId::new(1)).await.unwrap());
    }
}
