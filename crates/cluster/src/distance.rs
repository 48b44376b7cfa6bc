//! Pointwise distance kernels shared by the clustering stage.

use serde::{Deserialize, Serialize};

/// Distance function applied to the reduced embedding space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Straight-line distance. The default for low-dimensional layouts.
    #[default]
    Euclidean,
    /// Sum of absolute coordinate differences.
    Manhattan,
    /// One minus the cosine of the angle between the vectors.
    Cosine,
}

impl DistanceMetric {
    /// Distance between two equal-length vectors.
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => euclidean(a, b),
            DistanceMetric::Manhattan => manhattan(a, b),
            DistanceMetric::Cosine => cosine(a, b),
        }
    }
}

#[inline]
fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

#[inline]
fn manhattan(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Cosine distance in [0, 2]. Zero-norm vectors compare equal to each
/// other and maximally distant from everything else.
#[inline]
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return if norm_a == norm_b { 0.0 } else { 1.0 };
    }
    (1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())).max(0.0)
}
