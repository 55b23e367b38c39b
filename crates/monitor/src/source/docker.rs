use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

use super::error::SourceError;
use super::traits::{WorkloadInventory, WorkloadSample};

#[derive(Debug, Clone, PartialEq)]
pub enum DockerEndpoint {
    Unix(PathBuf),
    Http(String),
}

impl DockerEndpoint {
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        if let Some(path) = raw.strip_prefix("unix://") {
            return Ok(Self::Unix(PathBuf::from(path)));
        }
        if let Some(rest) = raw.strip_prefix("tcp://") {
            return Ok(Self::Http(format!("http://{}", rest.trim_end_matches('/'))));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::Http(raw.trim_end_matches('/').to_string()));
        }
        Err(SourceError::Unavailable(format!(
            "unsupported docker endpoint {raw:?}"
        )))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerSummary {
    id: String,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct ContainerStats {
    cpu_stats: CpuStats,
    memory_stats: MemoryStats,
}

#[derive(Debug, Deserialize)]
struct CpuStats {
    cpu_usage: CpuUsage,
}

#[derive(Debug, Deserialize)]
struct CpuUsage {
    #[serde(default)]
    total_usage: u64,
}

#[derive(Debug, Deserialize)]
struct MemoryStats {
    #[serde(default)]
    usage: u64,
    #[serde(default)]
    limit: u64,
}

pub struct DockerProbe {
    endpoint: DockerEndpoint,
    client: Client,
}

impl DockerProbe {
    pub fn new(endpoint: DockerEndpoint) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }

    pub async fn sample(&self) -> Result<WorkloadInventory, SourceError> {
        let containers: Vec<ContainerSummary> = self.get_json("/containers/json").await?;

        let stats = futures::future::join_all(containers.iter().map(|c| {
            self.get_json::<ContainerStats>(format!(
                "/containers/{}/stats?stream=false&one-shot=true",
                c.id
            ))
        }))
        .await;

        let mut workloads = Vec::with_capacity(containers.len());
        for (container, stats) in containers.iter().zip(stats) {
            match stats {
                Ok(stats) => workloads.push(to_sample(container, &stats)),
                Err(e) => {
                    tracing::warn!(container_id = %container.id, error = %e, "container stats unavailable, skipping");
                }
            }
        }

        Ok(WorkloadInventory {
            count: containers.len(),
            workloads,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: impl AsRef<str>) -> Result<T, SourceError> {
        let path = path.as_ref();
        let body = match &self.endpoint {
            DockerEndpoint::Unix(socket) => unix_get(socket, path).await?,
            DockerEndpoint::Http(base) => self
                .client
                .get(format!("{base}{path}"))
                .send()
                .await
                .map_err(|e| SourceError::Unavailable(e.to_string()))?
                .error_for_status()
                .map_err(|e| SourceError::Unavailable(e.to_string()))?
                .bytes()
                .await
                .map_err(|e| SourceError::Unavailable(e.to_string()))?
                .to_vec(),
        };
        serde_json::from_slice(&body)
            .map_err(|e| SourceError::Unavailable(format!("decode {path}: {e}")))
    }
}

fn to_sample(container: &ContainerSummary, stats: &ContainerStats) -> WorkloadSample {
    let name = container
        .names
        .first()
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| container.id.chars().take(12).collect());
    WorkloadSample {
        id: container.id.clone(),
        name,
        status: container.state.clone(),
        cpu_usage: stats.cpu_stats.cpu_usage.total_usage,
        memory_usage: stats.memory_stats.usage,
        memory_limit: stats.memory_stats.limit,
    }
}

#[cfg(unix)]
async fn unix_get(socket: &std::path::Path, path: &str) -> Result<Vec<u8>, SourceError> {
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper_util::client::legacy::Client;
    use hyperlocal::{UnixClientExt, UnixConnector, Uri};

    let client: Client<UnixConnector, Empty<Bytes>> = Client::unix();
    let response = client
        .get(Uri::new(socket, path).into())
        .await
        .map_err(|e| SourceError::Unavailable(format!("connect {}: {e}", socket.display())))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Unavailable(format!("{path}: status {status}")));
    }
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| SourceError::Unavailable(format!("{path}: {e}")))?
        .to_bytes();
    Ok(body.to_vec())
}

#[cfg(not(unix))]
async fn unix_get(socket: &std::path::Path, _path: &str) -> Result<Vec<u8>, SourceError> {
    Err(SourceError::Unavailable(format!(
        "unix socket {} not supported on this platform",
        socket.display()
    )))
}
