use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use super::error::StoreError;
use super::traits::TimeSeriesStore;
use crate::point::{Aggregation, FieldValue, Fields, Point, RangeQuery, Row};

#[derive(Clone, Default)]
pub struct MemoryStore {
    series: Arc<DashMap<String, Vec<Point>>>,
    retention: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    pub fn len(&self, measurement: &str) -> usize {
        self.series.get(measurement).map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.is_empty())
    }

    fn append(&self, point: &Point) {
        let mut series = self.series.entry(point.measurement.clone()).or_default();

        if let Some(cutoff) = self.retention.map(|r| Utc::now() - r) {
            series.retain(|p| p.timestamp >= cutoff);
        }

        match series
            .iter_mut()
            .find(|p| p.timestamp == point.timestamp && p.tags == point.tags)
        {
            Some(existing) => existing
                .fields
                .extend(point.fields.iter().map(|(k, v)| (k.clone(), v.clone()))),
            None => series.push(point.clone()),
        }
    }
}

#[async_trait]
impl TimeSeriesStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write(&self, points: &[Point]) -> Result<(), StoreError> {
        for point in points {
            if point.fields.is_empty() {
                return Err(StoreError::Write(format!(
                    "point in {} has no fields",
                    point.measurement
                )));
            }
        }
        for point in points {
            self.append(point);
        }
        Ok(())
    }

    async fn query(&self, query: &RangeQuery) -> Result<Vec<Row>, StoreError> {
        let mut rows: Vec<Row> = match self.series.get(&query.measurement) {
            Some(series) => series
                .iter()
                .filter(|p| query.range.contains(p.timestamp))
                .filter_map(|p| project(p, query.field.as_deref()))
                .collect(),
            None => Vec::new(),
        };
        rows.sort_by_key(|r| r.timestamp);

        match query.aggregation {
            None => Ok(rows),
            Some(Aggregation::Mean) => {
                let field = query
                    .field
                    .as_deref()
                    .ok_or_else(|| StoreError::Query("mean requires a field".into()))?;
                let values: Vec<f64> = rows
                    .iter()
                    .filter_map(|r| r.value(field).and_then(FieldValue::as_f64))
                    .collect();
                if values.is_empty() {
                    return Ok(Vec::new());
                }
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                let mut fields = Fields::new();
                fields.insert(field.to_string(), FieldValue::Float(mean));
                Ok(vec![Row {
                    timestamp: query.range.stop,
                    tags: Default::default(),
                    fields,
                }])
            }
        }
    }
}

fn project(point: &Point, field: Option<&str>) -> Option<Row> {
    let fields = match field {
        Some(name) => {
            let value = point.fields.get(name)?;
            let mut fields = Fields::new();
            fields.insert(name.to_string(), value.clone());
            fields
        }
        None => point.fields.clone(),
    };
    Some(Row {
        timestamp: point.timestamp,
        tags: point.tags.clone(),
        fields,
    })
}
