//! Pair-contraction surfel reduction for point-cloud level-of-detail (LOD)
//! hierarchies.
//!
//! Given several child nodes of surfels, [`reduction::create_lod`] produces
//! one parent node with a bounded surfel count by iteratively merging
//! nearest-neighbor pairs in order of minimum quadric error.
//!
//! # Basic usage
//! ```
//! use surfel_reduce::prelude::*;
//!
//! let input = vec![generate_surfel_grid(4, 4)];
//! let params = ReductionParams::new(8).neighbors(4).log_progress(false);
//!
//! let (surfels, _reduction_error, _stats) = create_lod(&input, params).unwrap();
//! assert!(surfels.len() <= 8);
//! ```
pub mod constants;
pub mod contraction;
pub mod contraction_index;
pub mod error;
pub mod knn;
pub mod priority_queue;
pub mod quadric;
pub mod reduction;
pub mod surfel;
pub mod util;
pub mod vector;

pub mod prelude;
