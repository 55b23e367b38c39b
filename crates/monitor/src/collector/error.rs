use hostpulse_common::StoreError;

use crate::source::SourceError;

#[derive(Debug)]
pub enum CycleError {
    Host(SourceError),
    Workloads(SourceError),
    Store(StoreError),
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host(e) => write!(f, "host sample: {e}"),
            Self::Workloads(e) => write!(f, "workload sample: {e}"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(e) | Self::Workloads(e) => Some(e),
            Self::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for CycleError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
