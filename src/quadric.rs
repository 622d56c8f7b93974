//! Edge-quadric construction and quadric-error evaluation.
use crate::constants::Real;
use crate::vector::{Mat4, Vec3, Vec4};

/// Builds the symmetric quadric `Q = h * h^T` for the plane spanned by two
/// neighboring oriented samples `(p1, n1)` and `(p2, n2)`.
///
/// The plane is defined by an edge-aligned tangent frame:
/// - `edge_dir = normalize(p2 - p1)`, origin-independent rather than
///   oriented by which endpoint is farther from the origin.
/// - `tangent = normalize(cross(normalize(n1 + n2), edge_dir))`
/// - `n = cross(tangent, edge_dir)`, rescaled so its components sum to one
///   via `n / (n.x + n.y + n.z)`.
///
/// Returns `None` on any numerical degeneracy (zero-length edge, zero
/// summed normal, zero tangent, zero normal-component sum, or a non-finite
/// result) rather than producing a nonsensical quadric. Callers treat this
/// as a numerical fault: the offending contraction is dropped.
pub fn edge_quadric(p1: Vec3, n1: Vec3, p2: Vec3, n2: Vec3) -> Option<Mat4> {
    let edge_dir = (p2 - p1).normalized()?;

    let avg_normal = (n1 + n2).normalized()?;
    let tangent = avg_normal.cross(edge_dir).normalized()?;

    let mut normal = tangent.cross(edge_dir);
    let divisor = normal.sum_components();
    if divisor.abs() <= crate::constants::ERROR_EPSILON {
        return None;
    }
    normal = normal / divisor;

    let hessian = Vec4::from_normal(normal, -normal.dot(p1));
    let quadric = Mat4::outer(hessian);

    if !quadric.is_finite() {
        return None;
    }
    Some(quadric)
}

/// Evaluates `(p, 1) * Q * (p, 1)^T`, the cost of placing `p` against the
/// planes summarized by `quadric`. Non-negative by construction since `Q`
/// is a sum of outer products `h * h^T`.
pub fn quadric_error(p: Vec3, quadric: &Mat4) -> Real {
    quadric.quadratic_form(Vec4::from_point(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quadric_error_is_non_negative() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(1.0, 0.0, 0.0);
        let n = Vec3::new(0.0, 0.0, 1.0);
        let q = edge_quadric(p1, n, p2, n).expect("non-degenerate edge");
        for p in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(5.0, -3.0, 2.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ] {
            assert!(quadric_error(p, &q) >= -1e-8);
        }
    }

    #[test]
    fn collinear_points_give_near_zero_error_at_midpoint() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(1.0, 0.0, 0.0);
        let q = edge_quadric(p0, n, p1, n).expect("non-degenerate edge");
        let midpoint = Vec3::new(0.5, 0.0, 0.0);
        assert_abs_diff_eq!(quadric_error(midpoint, &q), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn opposite_normals_cancel_to_degenerate() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(0.1, 0.0, 0.0);
        let n1 = Vec3::new(0.0, 0.0, 1.0);
        let n2 = Vec3::new(0.0, 0.0, -1.0);
        assert_eq!(edge_quadric(p1, n1, p2, n2), None);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(edge_quadric(p, n, p, n), None);
    }
}
