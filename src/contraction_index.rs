//! Bidirectional contraction index: `SurfelId -> (SurfelId -> ContractionHandle)`
//! such that for any live edge `{a,b}`, both directions resolve to the same
//! handle.
use rustc_hash::FxHashMap;

use crate::contraction::{Contraction, ContractionHandle, Edge};
use crate::error::{ReductionError, Result};
use crate::surfel::SurfelId;

/// Owns the contraction arena and the per-surfel neighbor maps.
///
/// The arena never frees a slot: once a handle is issued it stays valid for
/// the lifetime of the index (slots whose contraction has been superseded
/// are simply unreachable from both neighbor maps and the priority queue).
/// This keeps handle bookkeeping trivial at the cost of transient memory
/// that is bounded by the total number of contractions ever proposed —
/// `O(N*k)` for the lifetime of one `create_lod` call.
#[derive(Default)]
pub struct ContractionIndex {
    arena: Vec<Contraction>,
    neighbors: FxHashMap<SurfelId, FxHashMap<SurfelId, ContractionHandle>>,
}

impl ContractionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contraction(&self, handle: ContractionHandle) -> &Contraction {
        &self.arena[handle]
    }

    /// Returns the handle of the live contraction between `owner` and
    /// `neighbor`, if any.
    pub fn get(&self, owner: SurfelId, neighbor: SurfelId) -> Option<ContractionHandle> {
        self.neighbors.get(&owner).and_then(|m| m.get(&neighbor)).copied()
    }

    pub fn has_edge(&self, a: SurfelId, b: SurfelId) -> bool {
        self.get(a, b).is_some()
    }

    /// Inserts a brand-new contraction, allocating a fresh handle, and wires
    /// both directions of its edge into the neighbor maps.
    pub fn insert(&mut self, contraction: Contraction) -> ContractionHandle {
        let handle = self.arena.len();
        let Edge { a, b } = contraction.edge;
        self.arena.push(contraction);
        self.neighbors.entry(a).or_default().insert(b, handle);
        self.neighbors.entry(b).or_default().insert(a, handle);
        handle
    }

    /// Rekeys the edge endpoint `old_owner` to `new_owner` for the
    /// contraction identified by `handle`, reusing the same arena slot and
    /// overwriting it with `updated`. `neighbor` is the other (unchanged)
    /// endpoint.
    ///
    /// Leaves `old_owner`'s own map untouched; callers drop it wholesale via
    /// [`ContractionIndex::take_neighbors`] once all of its edges have been
    /// rewired or discarded.
    pub fn rekey(
        &mut self,
        old_owner: SurfelId,
        new_owner: SurfelId,
        neighbor: SurfelId,
        handle: ContractionHandle,
        updated: Contraction,
    ) {
        self.arena[handle] = updated;
        self.neighbors.entry(new_owner).or_default().insert(neighbor, handle);
        if let Some(m) = self.neighbors.get_mut(&neighbor) {
            m.remove(&old_owner);
            m.insert(new_owner, handle);
        }
    }

    /// Removes and returns every `(neighbor, handle)` pair owned by `id`,
    /// dropping `id`'s own map entirely. Does not touch the mirrored entry
    /// kept under each neighbor — callers that are retiring `id` altogether
    /// must also clear those via [`ContractionIndex::remove_mirror`].
    pub fn take_neighbors(&mut self, id: SurfelId) -> Vec<(SurfelId, ContractionHandle)> {
        match self.neighbors.remove(&id) {
            Some(m) => m.into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Removes `owner`'s mirrored entry from `neighbor`'s map (the other
    /// half of a bidirectional pair being torn down).
    pub fn remove_mirror(&mut self, neighbor: SurfelId, owner: SurfelId) {
        if let Some(m) = self.neighbors.get_mut(&neighbor) {
            m.remove(&owner);
        }
    }

    /// Debug-only check of the bidirectional-consistency invariant: for
    /// every live `(a, b)`, `index[a][b]` and `index[b][a]` must name the
    /// same handle. Compiled into the contraction loop only under
    /// `debug_assertions`, since internal-invariant checks of this kind are
    /// diagnostic rather than load-bearing at runtime.
    #[cfg(debug_assertions)]
    pub fn check_consistency(&self) -> Result<()> {
        for (owner, edges) in &self.neighbors {
            for (neighbor, handle) in edges {
                let mirrored = self
                    .neighbors
                    .get(neighbor)
                    .and_then(|m| m.get(owner))
                    .copied();
                if mirrored != Some(*handle) {
                    return Err(ReductionError::InvariantViolation {
                        a: *owner,
                        b: *neighbor,
                        detail: format!(
                            "index[{owner:?}][{neighbor:?}] = {handle:?} but mirror resolved to {mirrored:?}"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfel::Surfel;
    use crate::vector::{Mat4, Vec3};

    fn dummy_contraction(a: SurfelId, b: SurfelId) -> Contraction {
        Contraction {
            edge: Edge::new(a, b),
            merged_quadric: Mat4::zero(),
            error: 0.0,
            new_surfel: Surfel::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 1.0),
        }
    }

    #[test]
    fn insert_is_bidirectional() {
        let mut idx = ContractionIndex::new();
        let a = SurfelId::new(0, 0);
        let b = SurfelId::new(0, 1);
        let handle = idx.insert(dummy_contraction(a, b));

        assert_eq!(idx.get(a, b), Some(handle));
        assert_eq!(idx.get(b, a), Some(handle));
        idx.check_consistency().unwrap();
    }

    #[test]
    fn rekey_moves_ownership_and_updates_mirror() {
        let mut idx = ContractionIndex::new();
        let a = SurfelId::new(0, 0);
        let b = SurfelId::new(0, 1);
        let new_id = SurfelId::new(1, 0);
        let handle = idx.insert(dummy_contraction(a, b));

        idx.rekey(a, new_id, b, handle, dummy_contraction(new_id, b));

        assert_eq!(idx.get(new_id, b), Some(handle));
        assert_eq!(idx.get(b, new_id), Some(handle));
        assert_eq!(idx.get(a, b), None);
        idx.check_consistency().unwrap();
    }

    #[test]
    fn take_neighbors_drains_owner_map() {
        let mut idx = ContractionIndex::new();
        let a = SurfelId::new(0, 0);
        let b = SurfelId::new(0, 1);
        let c = SurfelId::new(0, 2);
        idx.insert(dummy_contraction(a, b));
        idx.insert(dummy_contraction(a, c));

        let mut taken = idx.take_neighbors(a);
        taken.sort_by_key(|(id, _)| *id);
        assert_eq!(taken.len(), 2);
        assert_eq!(idx.take_neighbors(a), Vec::new());
    }
}
