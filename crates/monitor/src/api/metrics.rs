use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use hostpulse_common::{FieldValue, RangeQuery, Row, TimeRange};
use serde::Serialize;

use super::error::ApiError;
use super::state::AppState;
use crate::collector::SYSTEM_MEASUREMENT;

#[derive(Debug, Serialize, PartialEq)]
pub struct SeriesEntry {
    pub timestamp: DateTime<Utc>,
    pub value: Option<FieldValue>,
}

#[derive(Debug, Serialize, Default)]
pub struct MetricsResponse {
    pub cpu: Vec<SeriesEntry>,
    pub memory: Vec<SeriesEntry>,
    pub containers: Vec<SeriesEntry>,
}

impl MetricsResponse {
    fn from_rows(rows: &[Row]) -> Self {
        let series = |field: &str| -> Vec<SeriesEntry> {
            rows.iter()
                .map(|r| SeriesEntry {
                    timestamp: r.timestamp,
                    value: r.value(field).cloned(),
                })
                .collect()
        };
        Self {
            cpu: series("cpu_usage"),
            memory: series("memory_usage"),
            containers: series("container_count"),
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, ApiError> {
    let range = TimeRange::trailing(Duration::hours(1), Utc::now());
    let rows = state
        .store
        .query(&RangeQuery::new(SYSTEM_MEASUREMENT, range))
        .await?;
    Ok(Json(MetricsResponse::from_rows(&rows)))
}
