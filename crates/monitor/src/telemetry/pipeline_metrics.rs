use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    collect_cycles_ok: AtomicU64,
    collect_cycles_failed: AtomicU64,
    points_written: AtomicU64,
    rules_skipped: AtomicU64,
    alerts_raised: AtomicU64,
    alerts_suppressed: AtomicU64,
    notifications_sent: AtomicU64,
    notifications_failed: AtomicU64,
    alerts_persisted: AtomicU64,
    alerts_persist_failed: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_collect_cycles_ok(&self) {
        self.collect_cycles_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_collect_cycles_failed(&self) {
        self.collect_cycles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_points_written(&self, count: u64) {
        self.points_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_rules_skipped(&self) {
        self.rules_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_alerts_raised(&self, count: u64) {
        self.alerts_raised.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_alerts_suppressed(&self) {
        self.alerts_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_notifications_sent(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_notifications_failed(&self) {
        self.notifications_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_alerts_persisted(&self) {
        self.alerts_persisted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_alerts_persist_failed(&self) {
        self.alerts_persist_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn collect_cycles_ok_val(&self) -> u64 {
        self.collect_cycles_ok.load(Ordering::Relaxed)
    }

    pub fn collect_cycles_failed_val(&self) -> u64 {
        self.collect_cycles_failed.load(Ordering::Relaxed)
    }

    pub fn points_written_val(&self) -> u64 {
        self.points_written.load(Ordering::Relaxed)
    }

    pub fn rules_skipped_val(&self) -> u64 {
        self.rules_skipped.load(Ordering::Relaxed)
    }

    pub fn alerts_raised_val(&self) -> u64 {
        self.alerts_raised.load(Ordering::Relaxed)
    }

    pub fn alerts_suppressed_val(&self) -> u64 {
        self.alerts_suppressed.load(Ordering::Relaxed)
    }

    pub fn notifications_sent_val(&self) -> u64 {
        self.notifications_sent.load(Ordering::Relaxed)
    }

    pub fn notifications_failed_val(&self) -> u64 {
        self.notifications_failed.load(Ordering::Relaxed)
    }

    pub fn alerts_persisted_val(&self) -> u64 {
        self.alerts_persisted.load(Ordering::Relaxed)
    }

    pub fn alerts_persist_failed_val(&self) -> u64 {
        self.alerts_persist_failed.load(Ordering::Relaxed)
    }
}
