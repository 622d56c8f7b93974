//! Small fixture generators for tests and benches, the surfel-side
//! counterpart of `util::test_graphs`'s `generate_simple_graph`.
use crate::constants::Real;
use crate::surfel::{Surfel, SurfelNode};
use crate::vector::Vec3;

/// A flat grid of `width * height` surfels on the XY plane, unit spacing,
/// all sharing the `+Z` normal and radius `1.0`.
pub fn generate_surfel_grid(width: usize, height: usize) -> SurfelNode {
    let mut surfels = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            surfels.push(Surfel::new(
                Vec3::new(col as Real, row as Real, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::ZERO,
                1.0,
            ));
        }
    }
    SurfelNode::new(surfels)
}

/// `count` copies of the same surfel at `position`, all with `+Z` normal
/// and radius `1.0`. Used to exercise the "identical points collapse to
/// one" scenario.
pub fn generate_identical_surfels(position: Vec3, count: usize) -> SurfelNode {
    SurfelNode::new(vec![Surfel::new(position, Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 1.0); count])
}

/// A deterministic pseudo-random cloud of `count` surfels inside
/// `[0, extent)^3`, `+Z`-ish normals, used for stress and property tests.
/// Uses a small xorshift so the crate's test tooling doesn't need to
/// depend on `rand` outside of `dev-dependencies`.
pub fn generate_random_surfel_cloud(count: usize, extent: Real, seed: u64) -> SurfelNode {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state as f64 / u64::MAX as f64).abs()
    };

    let mut surfels = Vec::with_capacity(count);
    for _ in 0..count {
        let position = Vec3::new(
            next() * extent,
            next() * extent,
            next() * extent,
        );
        let normal = Vec3::new(next() - 0.5, next() - 0.5, next() - 0.5)
            .normalized()
            .unwrap_or(Vec3::new(0.0, 0.0, 1.0));
        surfels.push(Surfel::new(position, normal, Vec3::ZERO, 1.0));
    }
    SurfelNode::new(surfels)
}
