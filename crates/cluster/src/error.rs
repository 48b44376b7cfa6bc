use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `cluster` function.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    /// Configuration failed validation.
    #[error("invalid cluster config: {0}")]
    Config(#[from] ConfigError),
    /// One input vector has a different width than the first.
    #[error("point {index} has {got} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },
    /// One input vector contains NaN or an infinity.
    #[error("point {index} contains a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
    /// Input vectors must carry at least one coordinate.
    #[error("points must have at least one dimension")]
    EmptyDimension,
}
