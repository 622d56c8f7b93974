/// Real-valued scalar type used throughout the reduction core.
pub type Real = f64;

/// Default neighbor count `k` used by callers that don't specify one.
pub const DEFAULT_NEIGHBORS: usize = 20;

/// Small tolerance used when comparing quadric errors against zero.
pub const ERROR_EPSILON: Real = 1e-8;
