use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hostpulse_common::TimeSeriesStore;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::CycleError;
use super::points::{host_point, workload_point};
use super::state::{CollectorState, StateCell};
use crate::scheduler::Cycle;
use crate::source::{MetricSource, SourceError};
use crate::telemetry::PipelineMetrics;

#[derive(Debug, Default)]
pub struct CycleReport {
    pub points_written: usize,
    pub errors: Vec<CycleError>,
}

impl CycleReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Collector {
    source: Arc<dyn MetricSource>,
    store: Arc<dyn TimeSeriesStore>,
    sample_timeout: Duration,
    metrics: Arc<PipelineMetrics>,
    state: StateCell,
    last_ts_nanos: AtomicI64,
}

impl Collector {
    pub fn new(
        source: Arc<dyn MetricSource>,
        store: Arc<dyn TimeSeriesStore>,
        sample_timeout: Duration,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            source,
            store,
            sample_timeout,
            metrics,
            state: StateCell::default(),
            last_ts_nanos: AtomicI64::new(i64::MIN),
        }
    }

    pub fn state(&self) -> CollectorState {
        self.state.get()
    }

    pub async fn run_cycle(&self) -> CycleReport {
        self.state.set(CollectorState::Sampling);
        let report = self.sample_and_write().await;
        self.state.set(CollectorState::Idle);
        report
    }

    async fn sample_and_write(&self) -> CycleReport {
        let mut report = CycleReport::default();
        let ts = self.next_timestamp();

        let (host, workloads) = tokio::join!(
            bounded(self.sample_timeout, self.source.sample_host()),
            bounded(self.sample_timeout, self.source.sample_workloads()),
        );

        let mut points = Vec::new();
        let workloads = match workloads {
            Ok(inventory) => Some(inventory),
            Err(e) => {
                report.errors.push(CycleError::Workloads(e));
                None
            }
        };
        match host {
            Ok(sample) => points.push(host_point(
                &sample,
                workloads.as_ref().map(|w| w.count),
                ts,
            )),
            Err(e) => report.errors.push(CycleError::Host(e)),
        }
        if let Some(inventory) = &workloads {
            points.extend(inventory.workloads.iter().map(|w| workload_point(w, ts)));
        }

        if points.is_empty() {
            return report;
        }

        match self.store.write(&points).await {
            Ok(()) => {
                report.points_written = points.len();
                self.metrics.add_points_written(points.len() as u64);
            }
            Err(e) => report.errors.push(e.into()),
        }
        report
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let Some(now_nanos) = now.timestamp_nanos_opt() else {
            return now;
        };
        let previous = self.last_ts_nanos.fetch_max(now_nanos, Ordering::AcqRel);
        if previous > now_nanos {
            tracing::warn!(skew_ns = previous - now_nanos, "wall clock stepped back, reusing previous timestamp");
            return DateTime::from_timestamp_nanos(previous);
        }
        now
    }
}

async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, SourceError>>,
) -> Result<T, SourceError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| SourceError::Unavailable(format!("timed out after {}s", limit.as_secs_f64())))?
}

#[async_trait]
impl Cycle for Collector {
    fn name(&self) -> &str {
        "collector"
    }

    async fn run_once(&self) -> bool {
        let report = self.run_cycle().await;
        for error in &report.errors {
            tracing::warn!(error = %error, "collect cycle error");
        }
        if report.is_ok() {
            self.metrics.inc_collect_cycles_ok();
            tracing::debug!(points = report.points_written, "collect cycle complete");
            true
        } else {
            self.metrics.inc_collect_cycles_failed();
            false
        }
    }
}
