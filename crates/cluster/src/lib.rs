//! Density-based clustering for the theme assignment pipeline.
//!
//! Given low-dimensional embedding vectors, this crate finds the dense
//! regions and labels everything outside them noise. No cluster count
//! is chosen up front; the hierarchy decides how many dense regions
//! survive, and points that never sit inside one get the label `-1`.
//!
//! ## How it works
//!
//! - **Core distances** - Each point's distance to its k-th nearest
//!   neighbor, a cheap local density estimate.
//! - **Mutual reachability** - Pairwise distances smoothed by core
//!   distances, so sparse points cannot glue dense regions together.
//! - **Spanning tree + single linkage** - A minimum spanning tree over
//!   mutual reachability, merged bottom-up into a dendrogram.
//! - **Condense + extract** - Branches smaller than `min_cluster_size`
//!   fall out as candidate noise, and the surviving clusters are chosen
//!   by stability. Labels are dense ids `0..k` in tree order.
//!
//! All of it is deterministic for a given input order, including the
//! optional rayon path.
//!
//! ## Quick example
//!
//! ```
//! use cluster::{cluster, ClusterConfig};
//!
//! // Two tight groups of three identical points each.
//! let mut points = vec![vec![0.0f32, 0.0]; 3];
//! points.extend(vec![vec![9.0f32, 9.0]; 3]);
//!
//! let cfg = ClusterConfig::new().with_min_cluster_size(2);
//! let labels = cluster(&points, &cfg).unwrap();
//! assert_eq!(labels, vec![0, 0, 0, 1, 1, 1]);
//! ```
use std::time::Instant;

use tracing::{info, warn, Level};

mod config;
mod distance;
mod error;
mod extract;
mod graph;
mod tree;

pub use crate::config::{ClusterConfig, ConfigError};
pub use crate::distance::DistanceMetric;
pub use crate::error::ClusterError;

use crate::extract::extract_labels;
use crate::graph::{core_distances, sorted_mst_edges};
use crate::tree::{condense, single_linkage};

/// Clusters the given points and returns one label per point.
///
/// Labels are dense ids starting at `0`; noise points receive `-1`.
/// The output order matches the input order, and identical inputs with
/// identical configuration always produce identical labels.
///
/// # Errors
///
/// - [`ClusterError::Config`] when the configuration fails validation
/// - [`ClusterError::DimensionMismatch`] when the rows have uneven widths
/// - [`ClusterError::NonFiniteCoordinate`] when a coordinate is NaN or infinite
/// - [`ClusterError::EmptyDimension`] when the rows have zero width
pub fn cluster(points: &[Vec<f32>], cfg: &ClusterConfig) -> Result<Vec<i64>, ClusterError> {
    let start = Instant::now();
    let span = tracing::span!(
        Level::INFO,
        "cluster.cluster",
        points = points.len(),
        min_cluster_size = cfg.min_cluster_size
    );
    let _guard = span.enter();

    match cluster_inner(points, cfg) {
        Ok(labels) => {
            let elapsed_micros = start.elapsed().as_micros();
            let clusters = labels.iter().copied().max().map_or(0, |top| top + 1);
            let noise = labels.iter().filter(|&&label| label < 0).count();
            info!(clusters, noise, elapsed_micros, "cluster_success");
            Ok(labels)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "cluster_failure");
            Err(err)
        }
    }
}

fn cluster_inner(points: &[Vec<f32>], cfg: &ClusterConfig) -> Result<Vec<i64>, ClusterError> {
    cfg.validate()?;

    let n = points.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let expected = points[0].len();
    if expected == 0 {
        return Err(ClusterError::EmptyDimension);
    }
    for (index, point) in points.iter().enumerate() {
        if point.len() != expected {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected,
                got: point.len(),
            });
        }
        if point.iter().any(|value| !value.is_finite()) {
            return Err(ClusterError::NonFiniteCoordinate { index });
        }
    }

    // A lone point has no neighborhood to be dense in.
    if n == 1 {
        return Ok(vec![-1]);
    }

    let k = cfg.resolved_min_samples().min(n);
    let core = core_distances(points, k, cfg.metric, cfg.use_parallel);
    let edges = sorted_mst_edges(points, &core, cfg.metric);
    let merges = single_linkage(&edges, n);
    let condensed = condense(&merges, n, cfg.min_cluster_size);
    Ok(extract_labels(&condensed, n, cfg.min_cluster_size))
}
