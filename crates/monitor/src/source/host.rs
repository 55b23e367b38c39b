use std::sync::{Arc, Mutex};
use sysinfo::System;

use super::error::SourceError;
use super::traits::HostSample;

pub struct HostProbe {
    sys: Arc<Mutex<System>>,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe {
    pub fn new() -> Self {
        Self {
            sys: Arc::new(Mutex::new(System::new())),
        }
    }

    // Two CPU refreshes MINIMUM_CPU_UPDATE_INTERVAL apart, on the blocking pool.
    pub async fn sample(&self) -> Result<HostSample, SourceError> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|_| SourceError::Unavailable("host probe lock poisoned".into()))?;

            sys.refresh_cpu_usage();
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            sys.refresh_cpu_usage();
            sys.refresh_memory();

            let memory_total = sys.total_memory();
            if memory_total == 0 {
                return Err(SourceError::Unavailable("total memory reported as 0".into()));
            }
            let memory_used = sys.used_memory();

            Ok(HostSample {
                cpu_usage: f64::from(sys.global_cpu_usage()).clamp(0.0, 100.0),
                memory_usage: percent(memory_used, memory_total),
                memory_total,
                memory_used,
            })
        })
        .await
        .map_err(|e| SourceError::Unavailable(format!("host probe task: {e}")))?
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_total() {
        assert_eq!(percent(512, 1024), 50.0);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(2048, 1024), 100.0);
    }

    #[tokio::test]
    async fn samples_this_host() {
        let probe = HostProbe::new();
        let sample = probe.sample().await.unwrap();
        assert!(sample.memory_total > 0);
        assert!(sample.memory_used <= sample.memory_total);
        assert!((0.0..=100.0).contains(&sample.cpu_usage));
        assert!((0.0..=100.0).contains(&sample.memory_usage));
    }
}
