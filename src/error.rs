use std::path::PathBuf;
use thiserror::Error;

use crate::ir::CategoryId;

/// The main error type for coco-regroup operations.
#[derive(Debug, Error)]
pub enum RegroupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset JSON from {path}: {source}")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid dataset JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to write dataset JSON to {path}: {source}")]
    DatasetWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed dataset in '{collection}': {message}")]
    MalformedDataset {
        collection: &'static str,
        message: String,
    },

    #[error("Unknown policy '{name}' (available: {})", available.join(", "))]
    UnknownPolicy { name: String, available: Vec<String> },

    #[error("Policy '{policy}' declares target id {id} more than once")]
    DuplicateTargetId { policy: String, id: CategoryId },

    #[error("Failed to read policy file {path}: {source}")]
    PolicyFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy file {path}: {source}")]
    PolicyFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize run report: {0}")]
    ReportSerialize(#[source] serde_json::Error),
}
