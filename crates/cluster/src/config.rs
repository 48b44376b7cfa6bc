use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distance::DistanceMetric;

/// Errors detected while validating a [`ClusterConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_cluster_size must be at least 2, got {got}")]
    MinClusterSizeTooSmall { got: usize },
    #[error("min_samples must be at least 1 when set")]
    ZeroMinSamples,
}

/// Configuration for density-based cluster extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfig {
    /// Smallest group of points accepted as a cluster. Splinters below
    /// this size fall out of their parent as noise candidates.
    pub min_cluster_size: usize,
    /// Neighborhood size for core distances. `None` reuses
    /// `min_cluster_size`, which matches the common default.
    pub min_samples: Option<usize>,
    /// Distance function over the reduced space.
    pub metric: DistanceMetric,
    /// Compute core distances on the rayon thread pool. Output is
    /// identical either way.
    pub use_parallel: bool,
}

impl ClusterConfig {
    /// Create a configuration with the default field values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum cluster size.
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }

    /// Set the core-distance neighborhood size.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = Some(min_samples);
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Enable or disable parallel core-distance computation.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Effective neighborhood size once the `None` default is resolved.
    pub fn resolved_min_samples(&self) -> usize {
        self.min_samples.unwrap_or(self.min_cluster_size)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cluster_size < 2 {
            return Err(ConfigError::MinClusterSizeTooSmall {
                got: self.min_cluster_size,
            });
        }
        if self.min_samples == Some(0) {
            return Err(ConfigError::ZeroMinSamples);
        }
        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 100,
            min_samples: None,
            metric: DistanceMetric::Euclidean,
            use_parallel: false,
        }
    }
}
