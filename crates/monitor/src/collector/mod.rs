mod cycle;
mod error;
mod points;
mod state;

pub use cycle::{Collector, CycleReport};
pub use error::CycleError;
pub use points::{host_point, workload_point, CONTAINER_MEASUREMENT, SYSTEM_MEASUREMENT};
pub use state::CollectorState;
