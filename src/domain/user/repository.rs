//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserChanges, UserId};
use crate::domain::DomainError;

/// Durable, authoritative storage for user records
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// List all users ordered by id
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Get a user by id
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Create a user, assigning its id; `Conflict` if the email is taken
    async fn create(&self, data: NewUser) -> Result<User, DomainError>;

    /// Apply changes to an existing user; `NotFound` if absent, `Conflict`
    /// if the new email belongs to another user
    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, DomainError>;

    /// Delete a user; returns false if it did not exist
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// Cheap reachability check that reads no user rows
    async fn ping(&self) -> Result<(), DomainError>;
}
