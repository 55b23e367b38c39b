use chrono::{DateTime, Duration, Utc};
use hostpulse_common::{RangeQuery, TimeRange, TimeSeriesStore};
use std::sync::Arc;

use super::event::{Alert, AlertStatus};
use super::rule::ThresholdRule;
use crate::telemetry::PipelineMetrics;

pub struct ThresholdEvaluator {
    store: Arc<dyn TimeSeriesStore>,
    rules: Vec<ThresholdRule>,
    window: Duration,
    metrics: Arc<PipelineMetrics>,
}

impl ThresholdEvaluator {
    pub fn new(
        store: Arc<dyn TimeSeriesStore>,
        rules: Vec<ThresholdRule>,
        window: Duration,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            store,
            rules,
            window,
            metrics,
        }
    }

    pub async fn evaluate(&self, now: DateTime<Utc>) -> Vec<Alert> {
        let range = TimeRange::trailing(self.window, now);
        let observed =
            futures::future::join_all(self.rules.iter().map(|rule| self.observe(rule, range))).await;

        let mut alerts = Vec::new();
        for (rule, value) in self.rules.iter().zip(observed) {
            let Some(value) = value else { continue };
            if rule.is_breached_by(value) {
                alerts.push(Alert {
                    rule: rule.name.clone(),
                    severity: rule.severity,
                    message: rule.describe(value),
                    timestamp: now,
                    status: AlertStatus::Active,
                });
            }
        }

        if !alerts.is_empty() {
            self.metrics.add_alerts_raised(alerts.len() as u64);
        }
        tracing::debug!(rules = self.rules.len(), alerts = alerts.len(), "evaluation complete");
        alerts
    }

    async fn observe(&self, rule: &ThresholdRule, range: TimeRange) -> Option<f64> {
        let query = RangeQuery::new(rule.measurement.as_str(), range)
            .field(rule.field.as_str())
            .mean();

        let rows = match self.store.query(&query).await {
            Ok(rows) => rows,
            Err(e) => {
                self.metrics.inc_rules_skipped();
                tracing::warn!(rule = %rule.name, error = %e, "rule skipped, query failed");
                return None;
            }
        };

        let value = rows.first()?.value(&rule.field)?;
        match value.as_f64() {
            Some(v) => Some(v),
            None => {
                self.metrics.inc_rules_skipped();
                tracing::warn!(rule = %rule.name, value = ?value, "rule skipped, aggregate is not numeric");
                None
            }
        }
    }
}
