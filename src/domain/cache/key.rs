//! Cache key construction

use std::fmt::{self, Display};

/// Separator placed between a namespace and an identifier
pub const KEY_SEPARATOR: char = '_';

/// A cache key produced by [`build_key`]
///
/// Collection keys are the bare namespace. Item keys are the namespace,
/// the separator and the stringified identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the string representation of the key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Builds the cache key for a namespace and an optional identifier
pub fn build_key<I: Display + ?Sized>(namespace: &str, identifier: Option<&I>) -> CacheKey {
    match identifier {
        Some(id) => CacheKey(format!("{}{}{}", namespace, KEY_SEPARATOR, id)),
        None => CacheKey(namespace.to_string()),
    }
}

/// Builds a collection key (namespace only)
pub fn collection_key(namespace: &str) -> CacheKey {
    build_key::<str>(namespace, None)
}

/// Builds an item key for a single addressed record
pub fn item_key<I: Display + ?Sized>(namespace: &str, identifier: &I) -> CacheKey {
    build_key(namespace, Some(identifier))
}
