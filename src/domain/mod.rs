//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod user;

pub use cache::{
    build_key, collection_key, item_key, Cache, CacheExt, CacheKey, CacheStats, CacheStatsError,
};
pub use error::DomainError;
pub use user::{
    NewUser, User, UserChanges, UserId, UserRepository, UserResource, UserType,
    UserValidationError,
};
