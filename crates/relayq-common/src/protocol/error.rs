use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayqError {
    #[error("Directory unreachable: {0}")]
    DirectoryUnreachable(String),

    #[error("Directory protocol error: {0}")]
    DirectoryProtocol(String),

    #[error("Node unreachable: {0}")]
    NodeUnreachable(String),

    #[error("No available broker node")]
    NoAvailableNode,

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Rejected by broker: {0}")]
    Rejected(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayqError>;
