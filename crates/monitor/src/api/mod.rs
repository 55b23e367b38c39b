mod alerts;
mod error;
mod health;
mod metrics;
mod server;
mod state;
mod stats;

pub use alerts::AlertEntry;
pub use error::ApiError;
pub use metrics::{MetricsResponse, SeriesEntry};
pub use server::{router, serve};
pub use state::AppState;
