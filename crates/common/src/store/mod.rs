mod error;
mod influx;
mod memory;
mod timeout;
mod traits;

pub use error::StoreError;
pub use influx::{InfluxConfig, InfluxStore};
pub use memory::MemoryStore;
pub use timeout::TimeoutStore;
pub use traits::TimeSeriesStore;
