//! Store metrics collection.
//!
//! Records how long each store operation takes, labelled by backend.

use metrics::histogram;
use std::time::Instant;

/// Backend label for the PostgreSQL repositories.
pub const BACKEND_POSTGRES: &str = "postgres";

/// Backend label for the in-memory stores.
pub const BACKEND_MEMORY: &str = "memory";

/// Record the duration of one store operation.
pub fn record_query_duration(backend: &'static str, query_name: &'static str, duration_secs: f64) {
    histogram!(
        "advertisement_store_query_duration_seconds",
        "backend" => backend,
        "query" => query_name
    )
    .record(duration_secs);
}

/// Times a store operation and records it when dropped via [`QueryTimer::record`].
///
/// ```ignore
/// let timer = QueryTimer::new(BACKEND_POSTGRES, "list_published_ids");
/// let result = sqlx::query_scalar(...).fetch_all(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    backend: &'static str,
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(backend: &'static str, query_name: &'static str) -> Self {
        Self {
            backend,
            query_name,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(
            self.backend,
            self.query_name,
            self.start.elapsed().as_secs_f64(),
        );
    }
}
