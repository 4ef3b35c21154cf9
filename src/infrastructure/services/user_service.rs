//! Cache-aside service for the user resource
//!
//! Reads check the cache first and populate it on a miss. Writes go to the
//! repository and, only once the write has succeeded, drop every cache
//! entry the write could have made stale. The list cache is always dropped
//! whole; it is never patched in place.
//!
//! The cache is an optimization only: backend failures are logged and
//! absorbed, and every operation still completes against the repository.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::domain::cache::{collection_key, item_key, Cache, CacheExt, CacheKey};
use crate::domain::user::{
    validate_email, validate_name, validate_password, validate_phone_number, NewUser,
    UserChanges, UserId, UserRepository, UserResource, UserType, UserValidationError,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_error, record_cache_invalidation, record_cache_lookup, CacheLookup,
};
use crate::infrastructure::user::PasswordHasher;

/// Namespace of the single collection key for users
pub const USER_LIST_NAMESPACE: &str = "user_list";

/// Namespace of per-user item keys (`user_<id>`)
pub const USER_ITEM_NAMESPACE: &str = "user";

/// Request for creating a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub user_type: UserType,
    pub password: Option<String>,
}

/// Request for updating a user; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Absent keeps the number, `null` clears it
    #[serde(default, deserialize_with = "present_field")]
    pub phone_number: Option<Option<String>>,
    pub user_type: Option<UserType>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

/// Marks a field as present even when its value is `null`
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn invalid(e: UserValidationError) -> DomainError {
    DomainError::validation(e.to_string())
}

/// User service applying the cache-aside and invalidation policy
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
    hasher: Arc<dyn PasswordHasher>,
    ttl: Duration,
}

impl UserService {
    /// Create a new user service
    ///
    /// `ttl` is applied to every cache write.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        hasher: Arc<dyn PasswordHasher>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            hasher,
            ttl,
        }
    }

    /// TTL applied to cache writes
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// List all users, served from the collection cache when possible
    pub async fn list(&self) -> Result<Vec<UserResource>, DomainError> {
        let key = collection_key(USER_LIST_NAMESPACE);

        if let Some(cached) = self.cache_get::<Vec<UserResource>>(&key, "list").await {
            return Ok(cached);
        }

        let users = self.repository.list().await?;
        let resources: Vec<UserResource> = users.iter().map(UserResource::from).collect();

        self.cache_set(&key, &resources).await;

        Ok(resources)
    }

    /// Get a single user, served from its item cache when possible
    ///
    /// A missing user is never cached.
    pub async fn retrieve(&self, id: UserId) -> Result<UserResource, DomainError> {
        let key = item_key(USER_ITEM_NAMESPACE, &id);

        if let Some(cached) = self.cache_get::<UserResource>(&key, "item").await {
            return Ok(cached);
        }

        let user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;
        let resource = UserResource::from(&user);

        self.cache_set(&key, &resource).await;

        Ok(resource)
    }

    /// Create a user and drop the list cache
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResource, DomainError> {
        validate_email(&request.email).map_err(invalid)?;
        validate_name("first_name", &request.first_name).map_err(invalid)?;
        validate_name("last_name", &request.last_name).map_err(invalid)?;

        if let Some(phone) = &request.phone_number {
            validate_phone_number(phone).map_err(invalid)?;
        }

        let password = request
            .password
            .as_deref()
            .ok_or_else(|| invalid(UserValidationError::PasswordRequired))?;
        validate_password(password).map_err(invalid)?;

        let data = NewUser {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            user_type: request.user_type,
            password_hash: self.hasher.hash(password)?,
        };

        let user = self.repository.create(data).await?;
        info!(id = %user.id(), "Created user");

        // No item entry can exist yet for a fresh id
        self.invalidate(&[collection_key(USER_LIST_NAMESPACE)]).await;

        Ok(UserResource::from(&user))
    }

    /// Update a user and drop both the list cache and its item cache
    pub async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<UserResource, DomainError> {
        info!(id = %id, "Updating user");

        if let Some(email) = &request.email {
            validate_email(email).map_err(invalid)?;
        }

        if let Some(first_name) = &request.first_name {
            validate_name("first_name", first_name).map_err(invalid)?;
        }

        if let Some(last_name) = &request.last_name {
            validate_name("last_name", last_name).map_err(invalid)?;
        }

        if let Some(Some(phone)) = &request.phone_number {
            validate_phone_number(phone).map_err(invalid)?;
        }

        let password_hash = match request.password.as_deref() {
            Some(password) => {
                validate_password(password).map_err(invalid)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            user_type: request.user_type,
            is_active: request.is_active,
            password_hash,
        };

        let user = self.repository.update(id, &changes).await?;

        self.invalidate(&[
            collection_key(USER_LIST_NAMESPACE),
            item_key(USER_ITEM_NAMESPACE, &id),
        ])
        .await;

        Ok(UserResource::from(&user))
    }

    /// Delete a user and drop both the list cache and its item cache
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        info!(id = %id, "Deleting user");

        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        self.invalidate(&[
            collection_key(USER_LIST_NAMESPACE),
            item_key(USER_ITEM_NAMESPACE, &id),
        ])
        .await;

        Ok(())
    }

    /// Cache read that degrades every failure to a miss
    async fn cache_get<V>(&self, key: &CacheKey, kind: &'static str) -> Option<V>
    where
        V: DeserializeOwned + Send,
    {
        match self.cache.get::<V>(key.as_str()).await {
            Ok(Some(value)) => {
                debug!(key = %key, "Cache hit");
                record_cache_lookup(kind, CacheLookup::Hit);
                Some(value)
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                record_cache_lookup(kind, CacheLookup::Miss);
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to store");
                record_cache_error("get");
                record_cache_lookup(kind, CacheLookup::Miss);
                None
            }
        }
    }

    /// Cache write whose failure is logged and otherwise ignored
    async fn cache_set<V>(&self, key: &CacheKey, value: &V)
    where
        V: Serialize + Send + Sync,
    {
        match self.cache.set(key.as_str(), value, self.ttl).await {
            Ok(()) => debug!(key = %key, ttl_secs = self.ttl.as_secs(), "Cached value"),
            Err(e) => {
                warn!(key = %key, error = %e, "Cache write failed");
                record_cache_error("set");
            }
        }
    }

    /// Drops the given keys; must only run after the store write committed
    async fn invalidate(&self, keys: &[CacheKey]) {
        for key in keys {
            match self.cache.delete(key.as_str()).await {
                Ok(_) => {
                    debug!(key = %key, "Invalidated cache entry");
                    record_cache_invalidation(1);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Cache invalidation failed");
                    record_cache_error("delete");
                }
            }
        }
    }
}
