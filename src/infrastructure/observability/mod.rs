//! Observability infrastructure - Prometheus metrics

mod prometheus;

pub use self::prometheus::{
    create_metrics_router, init_metrics, record_cache_error, record_cache_invalidation,
    record_cache_lookup, record_http_request, CacheLookup, PrometheusMetrics,
};
