//! Flat cluster extraction from the condensed tree.
//!
//! Each candidate cluster is scored by its stability, the summed lambda
//! mass of everything that leaves it. Selection walks the candidates
//! bottom-up: a cluster wins when its own stability exceeds the combined
//! stability of its children, otherwise the children's score propagates
//! upward. Winners are renumbered in tree order so labels are stable
//! across runs.

use std::collections::{BTreeMap, BTreeSet};

use crate::tree::CondensedNode;

/// Assigns a label to every sample: `0..k` for members of the `k`
/// selected clusters, `-1` for noise.
pub(crate) fn extract_labels(
    condensed: &[CondensedNode],
    n_samples: usize,
    min_cluster_size: usize,
) -> Vec<i64> {
    let mut labels = vec![-1i64; n_samples];
    if condensed.is_empty() {
        return labels;
    }

    let root = n_samples;
    let mut births: BTreeMap<usize, f32> = BTreeMap::new();
    births.insert(root, 0.0);
    let mut children: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let mut cluster_parent: BTreeMap<usize, usize> = BTreeMap::new();
    for node in condensed {
        if node.id >= n_samples {
            births.insert(node.id, node.lambda);
            children.entry(node.parent).or_default().push(node.id);
            cluster_parent.insert(node.id, node.parent);
        }
    }

    let mut stability: BTreeMap<usize, f32> = births.keys().map(|&id| (id, 0.0)).collect();
    for node in condensed {
        let birth = births.get(&node.parent).copied().unwrap_or(0.0);
        let delta = node.lambda - birth;
        // Coincident points can produce inf - inf here. Skipping the
        // NaN keeps the finite mass that was already accumulated.
        if delta.is_nan() {
            continue;
        }
        if let Some(total) = stability.get_mut(&node.parent) {
            *total += delta * node.size as f32;
        }
    }

    // Candidate ids descend from leaves toward the root, so children
    // are settled before their parent compares against them.
    let candidates: Vec<usize> = births.keys().rev().copied().collect();
    let mut selected: BTreeSet<usize> = BTreeSet::new();
    for id in candidates {
        if id == root {
            continue;
        }
        let child_sum: f32 = children
            .get(&id)
            .map(|kids| kids.iter().filter_map(|kid| stability.get(kid)).sum())
            .unwrap_or(0.0);
        let own = stability.get(&id).copied().unwrap_or(0.0);
        if own > child_sum {
            selected.insert(id);
            let mut stack: Vec<usize> = children.get(&id).cloned().unwrap_or_default();
            while let Some(descendant) = stack.pop() {
                selected.remove(&descendant);
                if let Some(kids) = children.get(&descendant) {
                    stack.extend(kids);
                }
            }
        } else {
            stability.insert(id, child_sum);
        }
    }

    if selected.is_empty() {
        // A tree with no split large enough to open a second cluster
        // can still carry a coincident core: points whose lambda is
        // infinite because they sit at distance zero from each other.
        // They form one cluster when the core alone reaches the size
        // threshold; everything else stays noise.
        if births.len() == 1 {
            let core: Vec<usize> = condensed
                .iter()
                .filter(|node| {
                    node.id < n_samples && node.parent == root && node.lambda.is_infinite()
                })
                .map(|node| node.id)
                .collect();
            if core.len() >= min_cluster_size {
                for id in core {
                    labels[id] = 0;
                }
            }
        }
        return labels;
    }

    let label_of: BTreeMap<usize, i64> = selected
        .iter()
        .enumerate()
        .map(|(index, &id)| (id, index as i64))
        .collect();

    // A sample belongs to the selected ancestor of the cluster it fell
    // out of. Winners never nest, so the first hit is the only hit.
    for node in condensed.iter().filter(|node| node.id < n_samples) {
        let mut cursor = Some(node.parent);
        while let Some(cluster) = cursor {
            if let Some(&label) = label_of.get(&cluster) {
                labels[node.id] = label;
                break;
            }
            cursor = cluster_parent.get(&cluster).copied();
        }
    }
    labels
}
