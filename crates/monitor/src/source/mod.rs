mod docker;
mod error;
mod host;
mod system;
mod traits;

pub use docker::{DockerEndpoint, DockerProbe};
pub use error::SourceError;
pub use host::HostProbe;
pub use system::SystemSource;
pub use traits::{HostSample, MetricSource, WorkloadInventory, WorkloadSample};
