use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use hostpulse_common::{FieldValue, RangeQuery, Row, TimeRange};
use serde::Serialize;

use super::error::ApiError;
use super::state::AppState;
use crate::alert::ALERTS_MEASUREMENT;

#[derive(Debug, Serialize, PartialEq)]
pub struct AlertEntry {
    pub severity: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl AlertEntry {
    fn from_row(row: &Row) -> Self {
        let text = |field: &str| {
            row.value(field)
                .and_then(FieldValue::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            severity: row.tags.get("severity").cloned().unwrap_or_default(),
            message: text("message"),
            timestamp: row.timestamp,
            status: text("status"),
        }
    }
}

pub async fn alerts(State(state): State<AppState>) -> Result<Json<Vec<AlertEntry>>, ApiError> {
    let range = TimeRange::trailing(Duration::hours(24), Utc::now());
    let rows = state
        .store
        .query(&RangeQuery::new(ALERTS_MEASUREMENT, range))
        .await?;
    Ok(Json(rows.iter().map(AlertEntry::from_row).collect()))
}
