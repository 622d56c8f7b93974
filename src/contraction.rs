//! Contraction records: proposed merges of an edge into a new surfel.
use crate::constants::Real;
use crate::quadric::quadric_error;
use crate::surfel::{Surfel, SurfelId};
use crate::vector::Mat4;

/// An unordered pair of distinct [`SurfelId`]s, canonicalized with the
/// smaller id first so equality and hashing ignore endpoint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: SurfelId,
    pub b: SurfelId,
}

impl Edge {
    /// Canonicalizes `(x, y)` into an `Edge` with the smaller id first.
    /// Panics if `x == y`; an edge always joins two distinct surfels.
    pub fn new(x: SurfelId, y: SurfelId) -> Self {
        debug_assert_ne!(x, y, "an edge must join two distinct surfels");
        if x < y {
            Edge { a: x, b: y }
        } else {
            Edge { a: y, b: x }
        }
    }

    /// Returns the endpoint of this edge that is not `from`.
    pub fn other(&self, from: SurfelId) -> SurfelId {
        if self.a == from {
            self.b
        } else {
            debug_assert_eq!(self.b, from, "{from:?} is not an endpoint of {self:?}");
            self.a
        }
    }
}

/// An integer handle into the reduction driver's contraction arena. Doubles
/// as the key used by the priority queue: removing or re-keying a
/// contraction's priority and updating its arena slot are two views of the
/// same handle, so there is no separate generation counter to keep in sync.
pub type ContractionHandle = usize;

/// A proposed merge of the two surfels joined by `edge` into `new_surfel`,
/// with its combined quadric and the resulting quadric error.
#[derive(Debug, Clone, Copy)]
pub struct Contraction {
    pub edge: Edge,
    pub merged_quadric: Mat4,
    pub error: Real,
    pub new_surfel: Surfel,
}

/// Builds the merged surfel for endpoints `s_a, s_b`: midpoint
/// position/color/radius, and the normalized sum of normals (falling back
/// to `s_a`'s normal if the sum cancels to zero).
pub fn merge_surfels(s_a: Surfel, s_b: Surfel) -> Surfel {
    let normal = (s_a.normal + s_b.normal).normalized().unwrap_or(s_a.normal);
    Surfel::new(
        (s_a.position + s_b.position) * 0.5,
        normal,
        (s_a.color + s_b.color) * 0.5,
        (s_a.radius + s_b.radius) * 0.5,
    )
}

/// Builds the `Contraction` for `edge` given the current surfels and
/// quadrics of its two endpoints. Returns `None` if `s_a`/`s_b` fail to
/// combine into a finite contraction (non-finite merged quadric or error)
/// — a numerical degeneracy that the caller drops.
pub fn build_contraction(edge: Edge, s_a: Surfel, q_a: Mat4, s_b: Surfel, q_b: Mat4) -> Option<Contraction> {
    let new_surfel = merge_surfels(s_a, s_b);
    let merged_quadric = q_a + q_b;
    if !merged_quadric.is_finite() {
        return None;
    }
    let error = quadric_error(new_surfel.position, &merged_quadric);
    if !error.is_finite() {
        return None;
    }
    Some(Contraction {
        edge,
        merged_quadric,
        error,
        new_surfel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    #[test]
    fn edge_canonicalizes_smaller_id_first() {
        let a = SurfelId::new(0, 1);
        let b = SurfelId::new(0, 0);
        let e = Edge::new(a, b);
        assert_eq!(e.a, b);
        assert_eq!(e.b, a);
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
    }

    #[test]
    fn merge_falls_back_to_first_normal_on_cancellation() {
        let s_a = Surfel::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 1.0);
        let s_b = Surfel::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO, 1.0);
        let merged = merge_surfels(s_a, s_b);
        assert_eq!(merged.normal, s_a.normal);
        assert_eq!(merged.position, Vec3::new(1.0, 0.0, 0.0));
    }
}
