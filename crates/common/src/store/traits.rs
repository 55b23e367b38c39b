use async_trait::async_trait;

use super::error::StoreError;
use crate::point::{Point, RangeQuery, Row};

#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    fn name(&self) -> &str;

    async fn write(&self, points: &[Point]) -> Result<(), StoreError>;

    // Ascending by timestamp. An aggregation yields at most one row.
    async fn query(&self, query: &RangeQuery) -> Result<Vec<Row>, StoreError>;
}
