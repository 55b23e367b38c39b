pub mod codec;
pub mod point;
pub mod store;

pub use point::{Aggregation, FieldValue, Fields, Point, RangeQuery, Row, Tags, TimeRange};
pub use store::{InfluxConfig, InfluxStore, MemoryStore, StoreError, TimeSeriesStore, TimeoutStore};
