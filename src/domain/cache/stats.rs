//! Cache introspection report types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot of the cache keyspace for the user resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of keys in the whole backend
    pub total_keys: usize,
    /// Keys belonging to the user resource
    pub user_cache_keys: Vec<String>,
    pub user_cache_count: usize,
    /// Configured backend name
    pub cache_backend: String,
    /// Configured backend location
    pub cache_location: String,
    /// TTL applied to every cache write, in seconds
    pub default_timeout: u64,
}

/// Failure to produce a stats report
///
/// Distinct from a report with zero keys: an unreachable backend is never
/// reported as an empty cache.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CacheStatsError {
    #[error("Cache backend enumeration failed: {message}")]
    Backend { message: String },
}

impl CacheStatsError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// The underlying backend message
    pub fn message(&self) -> &str {
        match self {
            Self::Backend { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialization_field_names() {
        let stats = CacheStats {
            total_keys: 3,
            user_cache_keys: vec!["user_list".to_string(), "user_1".to_string()],
            user_cache_count: 2,
            cache_backend: "redis".to_string(),
            cache_location: "redis://127.0.0.1:6379/1".to_string(),
            default_timeout: 900,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_keys"], 3);
        assert_eq!(json["user_cache_count"], 2);
        assert_eq!(json["user_cache_keys"][0], "user_list");
        assert_eq!(json["cache_backend"], "redis");
        assert_eq!(json["cache_location"], "redis://127.0.0.1:6379/1");
        assert_eq!(json["default_timeout"], 900);
    }

    #[test]
    fn test_stats_error_message() {
        let error = CacheStatsError::backend("Connection refused");
        assert_eq!(error.message(), "Connection refused");
        assert_eq!(
            error.to_string(),
            "Cache backend enumeration failed: Connection refused"
        );
    }
}
