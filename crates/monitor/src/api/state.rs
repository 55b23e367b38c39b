use hostpulse_common::TimeSeriesStore;
use std::sync::Arc;

use crate::telemetry::PipelineMetrics;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TimeSeriesStore>,
    pub metrics: Arc<PipelineMetrics>,
}
