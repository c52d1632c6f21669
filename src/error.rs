//! Error taxonomy for the benchmark harness
//!
//! Per-trial and per-pair failures (`TimeoutExceeded`, `CandidateError`) are
//! always folded into a `MeasurementResult` at the lowest level and never
//! propagated upward; a run completes and is persisted with whatever partial
//! data was gathered. Only `ConfigInvalid` aborts a run, and only before any
//! measurement begins.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during benchmark execution and analysis
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("candidate exceeded {timeout_secs}s deadline")]
    TimeoutExceeded { timeout_secs: f32 },

    #[error("candidate failed: {0}")]
    CandidateError(String),

    #[error("snapshot unavailable: {path}: {reason}")]
    SnapshotUnavailable { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = BenchError::TimeoutExceeded { timeout_secs: 10.0 };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("deadline"));
    }

    #[test]
    fn test_config_invalid_display() {
        let err = BenchError::ConfigInvalid("stages must not be empty".to_string());
        assert!(err.to_string().contains("invalid configuration"));
        assert!(err.to_string().contains("stages"));
    }

    #[test]
    fn test_snapshot_unavailable_display() {
        let err = BenchError::SnapshotUnavailable {
            path: PathBuf::from("/tmp/missing.json"),
            reason: "not found".to_string(),
        };
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: BenchError = io.into();
        assert!(matches!(err, BenchError::Io(_)));
    }
}
