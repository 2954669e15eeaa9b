use nalgebra::{Point3, Vector3};

/// Vector pointing from `from` toward `to`.
#[inline]
pub fn displacement(from: &Point3<f64>, to: &Point3<f64>) -> Vector3<f64> {
    to - from
}

#[inline]
pub fn distance(p: &Point3<f64>, q: &Point3<f64>) -> f64 {
    (p - q).norm()
}

#[inline]
pub fn dot(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    v1.dot(v2)
}

#[inline]
pub fn magnitude(v: &Vector3<f64>) -> f64 {
    v.norm()
}

/// Normal of the plane spanned by `v1` and `v2` (the 3-D cross product).
#[inline]
pub fn plane_normal(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Vector3<f64> {
    v1.cross(v2)
}

/// Component-wise product `(x1·x2, y1·y2, z1·z2)`.
///
/// This is not a cross product. The torsion-force routine builds its auxiliary
/// vectors with it while the torsion-angle routine uses [`plane_normal`].
#[inline]
pub fn elementwise_product(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Vector3<f64> {
    v1.component_mul(v2)
}

/// Unit vector along `v`, or the zero vector when `v` has no length.
#[inline]
pub fn unit(v: &Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm < 1e-12 { Vector3::zeros() } else { v / norm }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn displacement_points_from_first_toward_second() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 6.0, 3.0);
        assert_eq!(displacement(&a, &b), Vector3::new(3.0, 4.0, 0.0));
        assert_eq!(displacement(&b, &a), Vector3::new(-3.0, -4.0, 0.0));
    }

    #[test]
    fn distance_is_euclidean_norm() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert!(f64_approx_equal(distance(&a, &b), 13.0));
        assert!(f64_approx_equal(distance(&b, &a), 13.0));
    }

    #[test]
    fn dot_and_magnitude_follow_standard_definitions() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = Vector3::new(-2.0, 0.5, 4.0);
        assert!(f64_approx_equal(dot(&v1, &v2), 11.0));
        assert!(f64_approx_equal(magnitude(&Vector3::new(2.0, 3.0, 6.0)), 7.0));
    }

    #[test]
    fn plane_normal_of_parallel_vectors_is_zero() {
        let v = Vector3::new(1.5, -2.0, 0.25);
        assert_eq!(plane_normal(&v, &v), Vector3::zeros());
    }

    #[test]
    fn plane_normal_is_orthogonal_to_both_inputs() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = Vector3::new(-4.0, 0.5, 2.0);
        let n = plane_normal(&v1, &v2);
        assert!(f64_approx_equal(dot(&n, &v1), 0.0));
        assert!(f64_approx_equal(dot(&n, &v2), 0.0));
    }

    #[test]
    fn plane_normal_of_unit_axes_follows_right_hand_rule() {
        let n = plane_normal(&Vector3::x(), &Vector3::y());
        assert_eq!(n, Vector3::z());
    }

    #[test]
    fn elementwise_product_multiplies_matching_components() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = Vector3::new(4.0, -5.0, 0.5);
        assert_eq!(elementwise_product(&v1, &v2), Vector3::new(4.0, -10.0, 1.5));
    }

    #[test]
    fn elementwise_product_differs_from_plane_normal() {
        let v1 = Vector3::x();
        let v2 = Vector3::y();
        assert_eq!(elementwise_product(&v1, &v2), Vector3::zeros());
        assert_ne!(plane_normal(&v1, &v2), Vector3::zeros());
    }

    #[test]
    fn unit_normalizes_and_handles_zero_vector() {
        let u = unit(&Vector3::new(0.0, 3.0, 4.0));
        assert!(f64_approx_equal(u.norm(), 1.0));
        assert!(f64_approx_equal(u.y, 0.6));
        assert_eq!(unit(&Vector3::zeros()), Vector3::zeros());
    }
}
