//! Re-exports of the most commonly used items in `surfel_reduce`.
pub use crate::error::{ReductionError, Result};
pub use crate::reduction::{create_lod, ReductionParams, ReductionStats};
pub use crate::surfel::{Surfel, SurfelId, SurfelNode};
pub use crate::vector::Vec3;

pub use crate::util::test_surfels::generate_surfel_grid;
