use async_trait::async_trait;

use super::docker::DockerProbe;
use super::error::SourceError;
use super::host::HostProbe;
use super::traits::{HostSample, MetricSource, WorkloadInventory};

pub struct SystemSource {
    host: HostProbe,
    docker: Option<DockerProbe>,
}

impl SystemSource {
    pub fn new(host: HostProbe, docker: Option<DockerProbe>) -> Self {
        Self { host, docker }
    }
}

#[async_trait]
impl MetricSource for SystemSource {
    async fn sample_host(&self) -> Result<HostSample, SourceError> {
        self.host.sample().await
    }

    async fn sample_workloads(&self) -> Result<WorkloadInventory, SourceError> {
        match &self.docker {
            Some(docker) => docker.sample().await,
            None => Ok(WorkloadInventory::default()),
        }
    }
}
