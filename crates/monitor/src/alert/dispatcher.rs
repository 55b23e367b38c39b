use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hostpulse_common::TimeSeriesStore;
use std::sync::Arc;

use super::event::Alert;
use crate::notifier::Notifier;
use crate::telemetry::PipelineMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Suppressed,
    Handled { notification: Delivery, persisted: bool },
}

struct NotifyTarget {
    notifier: Arc<dyn Notifier>,
    recipient: String,
}

pub struct AlertDispatcher {
    store: Arc<dyn TimeSeriesStore>,
    target: Option<NotifyTarget>,
    metrics: Arc<PipelineMetrics>,
    suppress_window: Option<Duration>,
    last_dispatched: DashMap<String, DateTime<Utc>>,
}

impl AlertDispatcher {
    pub fn new(store: Arc<dyn TimeSeriesStore>, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            store,
            target: None,
            metrics,
            suppress_window: None,
            last_dispatched: DashMap::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>, recipient: impl Into<String>) -> Self {
        self.target = Some(NotifyTarget {
            notifier,
            recipient: recipient.into(),
        });
        self
    }

    pub fn with_suppression(mut self, window: Duration) -> Self {
        self.suppress_window = (window > Duration::zero()).then_some(window);
        self
    }

    pub async fn dispatch(&self, alert: &Alert) -> DispatchOutcome {
        if self.suppressed(alert) {
            self.metrics.inc_alerts_suppressed();
            tracing::debug!(rule = %alert.rule, "alert suppressed");
            return DispatchOutcome::Suppressed;
        }

        let notification = self.notify(alert).await;
        let persisted = self.persist(alert).await;
        DispatchOutcome::Handled {
            notification,
            persisted,
        }
    }

    pub async fn dispatch_all(&self, alerts: &[Alert]) {
        for alert in alerts {
            self.dispatch(alert).await;
        }
    }

    fn suppressed(&self, alert: &Alert) -> bool {
        let Some(window) = self.suppress_window else {
            return false;
        };
        match self.last_dispatched.entry(alert.rule.clone()) {
            Entry::Occupied(mut seen) => {
                if alert.timestamp - *seen.get() < window {
                    return true;
                }
                seen.insert(alert.timestamp);
            }
            Entry::Vacant(slot) => {
                slot.insert(alert.timestamp);
            }
        }
        false
    }

    async fn notify(&self, alert: &Alert) -> Delivery {
        let Some(target) = &self.target else {
            return Delivery::Disabled;
        };

        match target
            .notifier
            .send(&alert.subject(), &alert.body(), &target.recipient)
            .await
        {
            Ok(()) => {
                self.metrics.inc_notifications_sent();
                tracing::info!(rule = %alert.rule, severity = %alert.severity, channel = target.notifier.name(), "alert notification sent");
                Delivery::Sent
            }
            Err(e) => {
                self.metrics.inc_notifications_failed();
                tracing::warn!(rule = %alert.rule, channel = target.notifier.name(), error = %e, "alert notification failed");
                Delivery::Failed
            }
        }
    }

    async fn persist(&self, alert: &Alert) -> bool {
        match self.store.write(&[alert.to_point()]).await {
            Ok(()) => {
                self.metrics.inc_alerts_persisted();
                true
            }
            Err(e) => {
                self.metrics.inc_alerts_persist_failed();
                tracing::error!(rule = %alert.rule, error = %e, "alert persistence failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::event::{AlertStatus, ALERTS_MEASUREMENT};
    use crate::alert::rule::Severity;
    use crate::notifier::NotifyError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use hostpulse_common::{MemoryStore, Point, RangeQuery, Row, StoreError, TimeRange};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        fail: bool,
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, subject: &str, body: &str, to: &str) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError("relay refused".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((subject.into(), body.into(), to.into()));
            Ok(())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl TimeSeriesStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }
        async fn write(&self, _points: &[Point]) -> Result<(), StoreError> {
            Err(StoreError::Write("disk full".into()))
        }
        async fn query(&self, _query: &RangeQuery) -> Result<Vec<Row>, StoreError> {
            Err(StoreError::Query("disk full".into()))
        }
    }

    fn at(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, sec).unwrap()
    }

    fn alert(ts: DateTime<Utc>) -> Alert {
        Alert {
            rule: "High CPU usage".into(),
            severity: Severity::Critical,
            message: "High CPU usage detected: 95.00 (greater than 90)".into(),
            timestamp: ts,
            status: AlertStatus::Active,
        }
    }

    async fn persisted(store: &MemoryStore) -> Vec<Row> {
        store
            .query(&RangeQuery::new(
                ALERTS_MEASUREMENT,
                TimeRange { start: at(0), stop: at(59) },
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn notifies_and_persists() {
        let store = MemoryStore::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let metrics = PipelineMetrics::new();
        let dispatcher = AlertDispatcher::new(Arc::new(store.clone()), metrics.clone())
            .with_notifier(notifier.clone(), "ops@example.com");

        let outcome = dispatcher.dispatch(&alert(at(1))).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled { notification: Delivery::Sent, persisted: true }
        );

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "[CRITICAL] Monitoring Alert");
        assert_eq!(sent[0].2, "ops@example.com");
        assert_eq!(persisted(&store).await.len(), 1);
        assert_eq!(metrics.notifications_sent_val(), 1);
    }

    #[tokio::test]
    async fn persists_when_notification_fails() {
        let store = MemoryStore::new();
        let notifier = Arc::new(RecordingNotifier { fail: true, ..Default::default() });
        let metrics = PipelineMetrics::new();
        let dispatcher = AlertDispatcher::new(Arc::new(store.clone()), metrics.clone())
            .with_notifier(notifier, "ops@example.com");

        let outcome = dispatcher.dispatch(&alert(at(1))).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled { notification: Delivery::Failed, persisted: true }
        );
        let rows = persisted(&store).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tags.get("severity").map(String::as_str), Some("critical"));
        assert_eq!(metrics.notifications_failed_val(), 1);
        assert_eq!(metrics.alerts_persisted_val(), 1);
    }

    #[tokio::test]
    async fn persistence_failure_is_contained() {
        let notifier = Arc::new(RecordingNotifier::default());
        let metrics = PipelineMetrics::new();
        let dispatcher = AlertDispatcher::new(Arc::new(BrokenStore), metrics.clone())
            .with_notifier(notifier.clone(), "ops@example.com");

        let outcome = dispatcher.dispatch(&alert(at(1))).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled { notification: Delivery::Sent, persisted: false }
        );
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
        assert_eq!(metrics.alerts_persist_failed_val(), 1);
    }

    #[tokio::test]
    async fn repeats_by_default() {
        let store = MemoryStore::new();
        let dispatcher = AlertDispatcher::new(Arc::new(store.clone()), PipelineMetrics::new());
        dispatcher.dispatch_all(&[alert(at(1)), alert(at(2)), alert(at(3))]).await;
        assert_eq!(persisted(&store).await.len(), 3);
    }

    #[tokio::test]
    async fn suppression_window_drops_repeats() {
        let store = MemoryStore::new();
        let metrics = PipelineMetrics::new();
        let dispatcher = AlertDispatcher::new(Arc::new(store.clone()), metrics.clone())
            .with_suppression(Duration::seconds(10));

        assert_ne!(dispatcher.dispatch(&alert(at(1))).await, DispatchOutcome::Suppressed);
        assert_eq!(dispatcher.dispatch(&alert(at(5))).await, DispatchOutcome::Suppressed);
        assert_ne!(dispatcher.dispatch(&alert(at(11))).await, DispatchOutcome::Suppressed);

        assert_eq!(persisted(&store).await.len(), 2);
        assert_eq!(metrics.alerts_suppressed_val(), 1);
    }
}
