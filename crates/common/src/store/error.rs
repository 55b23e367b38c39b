#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Write(String),
    Query(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write(e) => write!(f, "store write failed: {e}"),
            Self::Query(e) => write!(f, "store query failed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}
