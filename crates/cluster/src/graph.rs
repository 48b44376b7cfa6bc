//! Mutual reachability graph construction.
//!
//! Core distances smooth the raw metric by each point's local density,
//! and the minimum spanning tree over mutual reachability distances is
//! the only part of the graph the hierarchy ever needs. The tree is
//! built with a dense Prim scan, so no pairwise matrix is materialized.

use rayon::prelude::*;

use crate::distance::DistanceMetric;

/// An MST edge: endpoints and mutual reachability weight.
pub(crate) type Edge = (usize, usize, f32);

/// Distance from each point to its `k`-th nearest neighbor, counting
/// the point itself at rank one. `k` must be in `1..=points.len()`.
pub(crate) fn core_distances(
    points: &[Vec<f32>],
    k: usize,
    metric: DistanceMetric,
    use_parallel: bool,
) -> Vec<f32> {
    let kth = |i: usize| -> f32 {
        let mut dists: Vec<f32> = points.iter().map(|p| metric.distance(&points[i], p)).collect();
        let (_, value, _) = dists.select_nth_unstable_by(k - 1, |a, b| a.total_cmp(b));
        *value
    };

    if use_parallel {
        let mut out = Vec::with_capacity(points.len());
        (0..points.len())
            .into_par_iter()
            .map(kth)
            .collect_into_vec(&mut out);
        out
    } else {
        (0..points.len()).map(kth).collect()
    }
}

/// Minimum spanning tree over mutual reachability distances, returned
/// as edges sorted by ascending weight.
///
/// Mutual reachability between two points is the largest of their two
/// core distances and their metric distance. Ties are broken by scan
/// order, so the result is deterministic for a given input order.
pub(crate) fn sorted_mst_edges(
    points: &[Vec<f32>],
    core: &[f32],
    metric: DistanceMetric,
) -> Vec<Edge> {
    let n = points.len();
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    if n < 2 {
        return edges;
    }

    let mut in_tree = vec![false; n];
    let mut best = vec![f32::INFINITY; n];
    let mut best_from = vec![0usize; n];
    let mut current = 0usize;
    in_tree[0] = true;

    for _ in 1..n {
        let mut next = None;
        let mut next_weight = f32::INFINITY;
        for candidate in 0..n {
            if in_tree[candidate] {
                continue;
            }
            let d = metric.distance(&points[current], &points[candidate]);
            let weight = d.max(core[current]).max(core[candidate]);
            if weight < best[candidate] {
                best[candidate] = weight;
                best_from[candidate] = current;
            }
            if next.is_none() || best[candidate] < next_weight {
                next_weight = best[candidate];
                next = Some(candidate);
            }
        }
        // one non-tree candidate always remains inside this loop
        let Some(next) = next else { break };
        edges.push((best_from[next], next, next_weight));
        in_tree[next] = true;
        current = next;
    }

    edges.sort_by(|a, b| a.2.total_cmp(&b.2));
    edges
}
