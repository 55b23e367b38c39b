use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::error::StoreError;
use super::traits::TimeSeriesStore;
use crate::point::{Point, RangeQuery, Row};

pub struct TimeoutStore {
    inner: Arc<dyn TimeSeriesStore>,
    timeout: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn TimeSeriesStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl TimeSeriesStore for TimeoutStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn write(&self, points: &[Point]) -> Result<(), StoreError> {
        tokio::time::timeout(self.timeout, self.inner.write(points))
            .await
            .map_err(|_| StoreError::Write(format!("timed out after {:?}", self.timeout)))?
    }

    async fn query(&self, query: &RangeQuery) -> Result<Vec<Row>, StoreError> {
        tokio::time::timeout(self.timeout, self.inner.query(query))
            .await
            .map_err(|_| StoreError::Query(format!("timed out after {:?}", self.timeout)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::TimeRange;
    use crate::store::MemoryStore;
    use chrono::Utc;

    struct StalledStore;

    #[async_trait]
    impl TimeSeriesStore for StalledStore {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn write(&self, _points: &[Point]) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn query(&self, _query: &RangeQuery) -> Result<Vec<Row>, StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn slow_write_becomes_write_error() {
        let store = TimeoutStore::new(Arc::new(StalledStore), Duration::from_millis(20));
        let p = Point::new("system_metrics", Utc::now()).field("cpu_usage", 1.0);
        let err = store.write(&[p]).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn slow_query_becomes_query_error() {
        let store = TimeoutStore::new(Arc::new(StalledStore), Duration::from_millis(20));
        let q = RangeQuery::new(
            "system_metrics",
            TimeRange::trailing(chrono::Duration::hours(1), Utc::now()),
        );
        let err = store.query(&q).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let inner = MemoryStore::new();
        let store = TimeoutStore::new(Arc::new(inner.clone()), Duration::from_secs(1));
        let p = Point::new("system_metrics", Utc::now()).field("cpu_usage", 1.0);
        store.write(&[p]).await.unwrap();
        assert_eq!(inner.len("system_metrics"), 1);
        assert_eq!(store.name(), "memory");
    }
}
