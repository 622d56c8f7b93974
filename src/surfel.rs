//! Surfel records and their identifiers within the input fan-in.
use crate::constants::Real;
use crate::vector::Vec3;

/// Identifies a surfel within the ordered collection of input child nodes:
/// `(node_index, surfel_index)`. Ordered lexicographically so it can be used
/// directly as a map/set key and as the smaller-first endpoint of an
/// [`Edge`](crate::contraction::Edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfelId {
    pub node: usize,
    pub index: usize,
}

impl SurfelId {
    #[inline]
    pub fn new(node: usize, index: usize) -> Self {
        SurfelId { node, index }
    }
}

/// An oriented point sample: position, unit normal, color and radius.
///
/// A surfel with `radius <= 0.0` is logically removed; [`Surfel::is_live`]
/// is the sentinel check used throughout the driver and during final
/// compaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surfel {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub radius: Real,
}

impl Surfel {
    pub fn new(position: Vec3, normal: Vec3, color: Vec3, radius: Real) -> Self {
        Surfel {
            position,
            normal,
            color,
            radius,
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.radius > 0.0
    }

    /// Returns a copy with radius set to the "removed" sentinel (`-1.0`).
    pub fn removed(mut self) -> Self {
        self.radius = -1.0;
        self
    }
}

/// A node of the LOD hierarchy: a flat collection of surfels. This is the
/// in-memory stand-in for the surfel-array type the surrounding system
/// would provide: `length()`, `read_surfel(i)` and append-from-vector
/// construction are its entire contract; there is no file-backed
/// implementation in this crate.
#[derive(Debug, Clone, Default)]
pub struct SurfelNode {
    surfels: Vec<Surfel>,
}

impl SurfelNode {
    pub fn new(surfels: Vec<Surfel>) -> Self {
        SurfelNode { surfels }
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.surfels.len()
    }

    #[inline]
    pub fn read_surfel(&self, index: usize) -> Surfel {
        self.surfels[index]
    }

    pub fn as_slice(&self) -> &[Surfel] {
        &self.surfels
    }
}

impl From<Vec<Surfel>> for SurfelNode {
    fn from(surfels: Vec<Surfel>) -> Self {
        SurfelNode::new(surfels)
    }
}
