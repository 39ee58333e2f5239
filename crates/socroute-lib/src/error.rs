use std::path::PathBuf;

use thiserror::Error;

use crate::params::NUM_PATH_PARAMETERS;

/// Convenient result alias for the socroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a node identifier does not exist in the graph.
    #[error("node {node} does not exist (graph has {node_count} nodes)")]
    UnknownNode { node: usize, node_count: usize },

    /// Raised when graph input data is malformed or inconsistent.
    #[error("invalid graph data: {message}")]
    GraphData { message: String },

    /// Raised when the cover path bound is too small to describe a path.
    #[error("cover path bound k must be at least 2, got {k}")]
    InvalidCoverBound { k: usize },

    /// Raised when a cover-restricted search mode is requested without a cover.
    #[error("search mode {mode} requires a k-path cover")]
    CoverRequired { mode: String },

    /// Raised when epsilon coefficients have the wrong length or range.
    #[error(
        "epsilon coefficients must contain {expected} values in [0, 1], got {}",
        format_values(.values)
    )]
    InvalidEpsilonCoefficients { expected: usize, values: Vec<f64> },

    /// Raised when epsilon dominance is enabled before coefficients are set.
    #[error("epsilon dominance requires coefficients to be configured first")]
    EpsilonCoefficientsMissing,

    /// Raised when ellipse pruning is enabled before a goal is set.
    #[error("ellipse pruning requires an ellipse goal to be configured first")]
    EllipseGoalMissing,

    /// Raised when the ellipse margin coefficient is negative or not finite.
    #[error("ellipse coefficient must be a finite, non-negative number, got {value}")]
    InvalidEllipseCoefficient { value: f64 },

    /// Raised when a graph file could not be parsed.
    #[error("failed to parse {path}: {message}")]
    GraphFile { path: PathBuf, message: String },

    /// Wrapper for CSV errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_epsilon(values: &[f64]) -> Self {
        Error::InvalidEpsilonCoefficients {
            expected: NUM_PATH_PARAMETERS,
            values: values.to_vec(),
        }
    }
}

fn format_values(values: &[f64]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        format!(
            "[{}]",
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
