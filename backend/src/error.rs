use thiserror::Error;

use crate::{clustering::ClusterConfigError, upstream::UpstreamError};

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("failed to read zones file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid zones payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zones upstream error: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("invalid clustering parameters: {0}")]
    Config(#[from] ClusterConfigError),
}
