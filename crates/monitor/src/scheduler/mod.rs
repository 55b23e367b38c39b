mod cadence;
mod task;

pub use cadence::Cadence;
pub use task::{Cycle, ScheduledTask, TaskHandle};
