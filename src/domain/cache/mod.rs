//! Cache domain - key construction, backend abstraction and introspection types

mod key;
mod repository;
mod stats;

pub use key::{build_key, collection_key, item_key, CacheKey, KEY_SEPARATOR};
pub use repository::{glob_to_regex, Cache, CacheExt};
pub use stats::{CacheStats, CacheStatsError};

#[cfg(test)]
pub use repository::mock::MockCache;
