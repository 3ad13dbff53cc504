//! Error types for conformance runs

use crate::client::ServerRole;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for conformance operations
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors that can occur while preparing or executing a conformance run
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The results directory could not be wiped or recreated
    #[error("failed to reset results directory {path}: {source}")]
    ResetResultsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A failure artifact could not be written
    #[error("failed to write artifact {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run summary could not be written
    #[error("failed to write summary {path}: {source}")]
    WriteSummary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },

    /// A test case names a method that is not a valid HTTP token
    #[error("invalid HTTP method '{method}'")]
    InvalidMethod { method: String },

    /// The request to one of the servers failed
    #[error("{server} request failed: {source}")]
    Request {
        server: ServerRole,
        #[source]
        source: reqwest::Error,
    },
}
