use async_trait::async_trait;

use super::error::SourceError;

#[derive(Debug, Clone, PartialEq)]
pub struct HostSample {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub memory_total: u64,
    pub memory_used: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadSample {
    pub id: String,
    pub name: String,
    pub status: String,
    // cumulative counter, not a percentage
    pub cpu_usage: u64,
    pub memory_usage: u64,
    pub memory_limit: u64,
}

impl WorkloadSample {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadInventory {
    pub count: usize,
    pub workloads: Vec<WorkloadSample>,
}

#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn sample_host(&self) -> Result<HostSample, SourceError>;

    async fn sample_workloads(&self) -> Result<WorkloadInventory, SourceError>;
}
