//! Cluster hierarchy construction.
//!
//! Sorted MST edges become a single-linkage dendrogram via union-find,
//! and the dendrogram is condensed against the minimum cluster size:
//! splinters smaller than the threshold fall out of their parent as
//! individual points instead of opening a new branch.
//!
//! Node id conventions follow the usual dendrogram layout. Sample
//! points occupy ids `0..n`, merge nodes occupy `n..2n-1` in creation
//! order, and condensed cluster ids restart at `n` with the root.

use std::collections::VecDeque;

use crate::graph::Edge;

/// One merge in the single-linkage dendrogram. `left` and `right` are
/// ids of the merged children (samples or earlier merge nodes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MergeNode {
    pub left: usize,
    pub right: usize,
    pub distance: f32,
    pub size: usize,
}

/// One row of the condensed tree.
///
/// `id < n_samples` marks a point leaving cluster `parent` at density
/// `lambda`; larger ids mark a child cluster splitting off with the
/// given size. `lambda` is the reciprocal merge distance, infinite for
/// coincident points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CondensedNode {
    pub id: usize,
    pub parent: usize,
    pub lambda: f32,
    pub size: usize,
}

/// Builds the single-linkage dendrogram from edges sorted by weight.
pub(crate) fn single_linkage(edges: &[Edge], n_samples: usize) -> Vec<MergeNode> {
    let mut merges: Vec<MergeNode> = Vec::with_capacity(edges.len());
    if n_samples < 2 {
        return merges;
    }

    let total = 2 * n_samples - 1;
    let mut parent: Vec<usize> = (0..total).collect();
    let mut size: Vec<usize> = vec![1; total];

    for &(a, b, weight) in edges {
        let root_a = find(&mut parent, a);
        let root_b = find(&mut parent, b);
        let node = n_samples + merges.len();
        let merged = size[root_a] + size[root_b];
        merges.push(MergeNode {
            left: root_a,
            right: root_b,
            distance: weight,
            size: merged,
        });
        parent[root_a] = node;
        parent[root_b] = node;
        size[node] = merged;
    }
    merges
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Condenses the dendrogram against `min_cluster_size`.
///
/// The root cluster receives id `n_samples`. A split where both sides
/// reach the threshold creates two new cluster ids; otherwise the big
/// side keeps its parent's id and the small side's points fall out at
/// the split density.
pub(crate) fn condense(
    merges: &[MergeNode],
    n_samples: usize,
    min_cluster_size: usize,
) -> Vec<CondensedNode> {
    let mut condensed = Vec::new();
    if merges.is_empty() {
        return condensed;
    }

    let root = n_samples + merges.len() - 1;
    let mut relabel = vec![0usize; n_samples + merges.len()];
    relabel[root] = n_samples;
    let mut next_cluster = n_samples + 1;

    let mut queue = VecDeque::new();
    queue.push_back(root);

    while let Some(node) = queue.pop_front() {
        let merge = merges[node - n_samples];
        let lambda = if merge.distance > 0.0 {
            1.0 / merge.distance
        } else {
            f32::INFINITY
        };
        let cluster = relabel[node];
        let left_size = subtree_size(merges, n_samples, merge.left);
        let right_size = subtree_size(merges, n_samples, merge.right);

        match (left_size >= min_cluster_size, right_size >= min_cluster_size) {
            (true, true) => {
                for (child, child_size) in [(merge.left, left_size), (merge.right, right_size)] {
                    condensed.push(CondensedNode {
                        id: next_cluster,
                        parent: cluster,
                        lambda,
                        size: child_size,
                    });
                    relabel[child] = next_cluster;
                    next_cluster += 1;
                    queue.push_back(child);
                }
            }
            (true, false) => {
                relabel[merge.left] = cluster;
                queue.push_back(merge.left);
                shed_points(merges, n_samples, merge.right, cluster, lambda, &mut condensed);
            }
            (false, true) => {
                relabel[merge.right] = cluster;
                queue.push_back(merge.right);
                shed_points(merges, n_samples, merge.left, cluster, lambda, &mut condensed);
            }
            (false, false) => {
                shed_points(merges, n_samples, merge.left, cluster, lambda, &mut condensed);
                shed_points(merges, n_samples, merge.right, cluster, lambda, &mut condensed);
            }
        }
    }
    condensed
}

fn subtree_size(merges: &[MergeNode], n_samples: usize, node: usize) -> usize {
    if node < n_samples {
        1
    } else {
        merges[node - n_samples].size
    }
}

/// Emits every sample under `node` as falling out of `cluster` at `lambda`.
fn shed_points(
    merges: &[MergeNode],
    n_samples: usize,
    node: usize,
    cluster: usize,
    lambda: f32,
    condensed: &mut Vec<CondensedNode>,
) {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        if id < n_samples {
            condensed.push(CondensedNode {
                id,
                parent: cluster,
                lambda,
                size: 1,
            });
        } else {
            let merge = merges[id - n_samples];
            stack.push(merge.left);
            stack.push(merge.right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Chain of three close points plus one far outlier, pre-sorted.
    fn chain_edges() -> Vec<Edge> {
        vec![(0, 1, 1.0), (1, 2, 1.0), (2, 3, 8.0)]
    }

    #[test]
    fn single_linkage_builds_all_merges() {
        let merges = single_linkage(&chain_edges(), 4);
        assert_eq!(merges.len(), 3);
        assert_eq!(merges[0].size, 2);
        assert_eq!(merges[1].size, 3);
        assert_eq!(merges[2].size, 4);
        assert!((merges[2].distance - 8.0).abs() < 1e-6);
    }

    #[test]
    fn single_linkage_merges_roots_not_samples() {
        let merges = single_linkage(&chain_edges(), 4);
        // Second merge joins the first merge node (id 4) with sample 2.
        let second = merges[1];
        assert!(second.left == 4 || second.right == 4);
    }

    #[test]
    fn single_linkage_empty_input() {
        assert!(single_linkage(&[], 0).is_empty());
        assert!(single_linkage(&[], 1).is_empty());
    }

    #[test]
    fn condense_small_split_sheds_points() {
        let merges = single_linkage(&chain_edges(), 4);
        let condensed = condense(&merges, 4, 3);

        // No split has two sides of size >= 3, so the tree stays flat:
        // every sample falls out of the root.
        assert_eq!(condensed.len(), 4);
        assert!(condensed.iter().all(|node| node.parent == 4));
        assert!(condensed.iter().all(|node| node.id < 4));
    }

    #[test]
    fn condense_outlier_leaves_before_chain() {
        let merges = single_linkage(&chain_edges(), 4);
        let condensed = condense(&merges, 4, 3);

        let outlier = condensed
            .iter()
            .find(|node| node.id == 3)
            .expect("outlier row");
        let chain_lambda = condensed
            .iter()
            .filter(|node| node.id < 3)
            .map(|node| node.lambda)
            .fold(f32::INFINITY, f32::min);
        assert!(outlier.lambda < chain_lambda);
    }

    #[test]
    fn condense_big_big_split_creates_clusters() {
        // Two tight triples bridged by one long edge.
        let edges = vec![
            (0, 1, 1.0),
            (1, 2, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (2, 3, 20.0),
        ];
        let merges = single_linkage(&edges, 6);
        let condensed = condense(&merges, 6, 3);

        let clusters: Vec<&CondensedNode> =
            condensed.iter().filter(|node| node.id >= 6).collect();
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|node| node.parent == 6));
        assert_eq!(clusters.iter().map(|node| node.size).sum::<usize>(), 6);
    }

    #[test]
    fn condense_zero_distance_merge_gives_infinite_lambda() {
        let edges = vec![(0, 1, 0.0), (1, 2, 5.0)];
        let merges = single_linkage(&edges, 3);
        let condensed = condense(&merges, 3, 2);

        let coincident: Vec<&CondensedNode> = condensed
            .iter()
            .filter(|node| node.lambda.is_infinite())
            .collect();
        assert_eq!(coincident.len(), 2);
        assert!(coincident.iter().all(|node| node.id < 2));
    }

    #[test]
    fn condense_empty_tree() {
        assert!(condense(&[], 1, 2).is_empty());
    }
}
