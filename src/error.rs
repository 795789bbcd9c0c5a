use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdError {
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid match expression {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Failed to connect to hypervisor {uri}: {message}")]
    ConnectionFailed { uri: String, message: String },

    #[error("Failed to read hypervisor hostname: {0}")]
    HostnameUnavailable(String),

    #[error("Failed to list workloads: {0}")]
    EnumerationFailed(String),

    #[error("Failed to serialize target file: {0}")]
    SerializeError(String),

    #[error("Failed to write target file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Host task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, SdError>;
