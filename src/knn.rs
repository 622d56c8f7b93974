//! Local k-nearest-neighbor query over the union of input child nodes.
use crate::constants::Real;
use crate::surfel::{SurfelId, SurfelNode};

/// Returns up to `k` surfels nearest to `target` (by squared Euclidean
/// distance to its position), as `(id, sq_distance)` pairs sorted ascending.
/// Ties are broken by [`SurfelId`] ordering. `target` itself is excluded.
///
/// Implemented as a streaming scan with insertion-sort into a
/// length-bounded candidate list: `O(N*k)` overall, with the current worst
/// accepted distance used as an early-reject bound.
pub fn local_nearest_neighbors(
    nodes: &[SurfelNode],
    target: SurfelId,
    k: usize,
) -> Vec<(SurfelId, Real)> {
    if k == 0 {
        return Vec::new();
    }

    let center = nodes[target.node].read_surfel(target.index).position;

    let mut candidates: Vec<(SurfelId, Real)> = Vec::with_capacity(k + 1);
    let mut max_candidate_distance = Real::INFINITY;

    for (node_idx, node) in nodes.iter().enumerate() {
        for surfel_idx in 0..node.length() {
            let id = SurfelId::new(node_idx, surfel_idx);
            if id == target {
                continue;
            }

            let dist_sq = (center - node.read_surfel(surfel_idx).position).length_sq();
            if candidates.len() < k || dist_sq < max_candidate_distance {
                if candidates.len() == k {
                    candidates.pop();
                }
                candidates.push((id, dist_sq));

                // Insertion sort: bubble the new entry into place, breaking
                // ties by SurfelId so the result is deterministic.
                let mut pos = candidates.len() - 1;
                while pos > 0
                    && (candidates[pos].1, candidates[pos].0) < (candidates[pos - 1].1, candidates[pos - 1].0)
                {
                    candidates.swap(pos, pos - 1);
                    pos -= 1;
                }

                max_candidate_distance = candidates.last().map(|(_, d)| *d).unwrap_or(Real::INFINITY);
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfel::Surfel;
    use crate::vector::Vec3;

    fn node(points: &[(Real, Real, Real)]) -> SurfelNode {
        SurfelNode::new(
            points
                .iter()
                .map(|&(x, y, z)| Surfel::new(Vec3::new(x, y, z), Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 1.0))
                .collect(),
        )
    }

    #[test]
    fn finds_k_nearest_sorted_ascending() {
        let nodes = vec![node(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (2.0, 0.0, 0.0), (10.0, 0.0, 0.0)])];
        let target = SurfelId::new(0, 0);
        let neighbors = local_nearest_neighbors(&nodes, target, 2);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0, SurfelId::new(0, 1));
        assert_eq!(neighbors[1].0, SurfelId::new(0, 2));
        assert!(neighbors[0].1 <= neighbors[1].1);
    }

    #[test]
    fn searches_across_nodes() {
        let nodes = vec![
            node(&[(0.0, 0.0, 0.0)]),
            node(&[(0.5, 0.0, 0.0), (100.0, 0.0, 0.0)]),
        ];
        let target = SurfelId::new(0, 0);
        let neighbors = local_nearest_neighbors(&nodes, target, 1);
        assert_eq!(neighbors, vec![(SurfelId::new(1, 0), 0.25)]);
    }

    #[test]
    fn k_larger_than_input_returns_all_others() {
        let nodes = vec![node(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)])];
        let target = SurfelId::new(0, 0);
        let neighbors = local_nearest_neighbors(&nodes, target, 20);
        assert_eq!(neighbors.len(), 1);
    }

    #[test]
    fn zero_k_returns_empty() {
        let nodes = vec![node(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)])];
        let target = SurfelId::new(0, 0);
        assert!(local_nearest_neighbors(&nodes, target, 0).is_empty());
    }
}
