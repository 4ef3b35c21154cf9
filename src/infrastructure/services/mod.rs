//! Infrastructure services

mod cache_stats_service;
mod user_service;

pub use cache_stats_service::{CacheStatsService, USER_KEY_MARKER};
pub use user_service::{
    CreateUserRequest, UpdateUserRequest, UserService, USER_ITEM_NAMESPACE, USER_LIST_NAMESPACE,
};
