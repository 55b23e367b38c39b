use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::cadence::Cadence;

#[async_trait]
pub trait Cycle: Send + Sync {
    fn name(&self) -> &str;

    async fn run_once(&self) -> bool;
}

pub struct ScheduledTask {
    pub cadence: Cadence,
    pub cycle: Arc<dyn Cycle>,
}

pub struct TaskHandle {
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "scheduled task panicked");
        }
    }
}

impl ScheduledTask {
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> TaskHandle {
        TaskHandle {
            handle: tokio::spawn(self.run(shutdown)),
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let name = self.cycle.name().to_string();
        let mut consecutive_failures = 0u32;
        tracing::info!(task = %name, interval_s = self.cadence.base.as_secs_f64(), "scheduled task started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            if self.cycle.run_once().await {
                if consecutive_failures > 0 {
                    tracing::info!(task = %name, after_failures = consecutive_failures, "cycle recovered");
                }
                consecutive_failures = 0;
            } else {
                consecutive_failures = consecutive_failures.saturating_add(1);
            }

            let delay = self.cadence.next_delay(consecutive_failures);
            if consecutive_failures > 0 {
                tracing::warn!(task = %name, consecutive_failures, delay_s = delay.as_secs_f64(), "cycle failed, backing off");
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!(task = %name, "scheduled task stopped");
    }
}
