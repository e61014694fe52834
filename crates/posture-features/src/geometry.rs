//! Landmark geometry helpers

use crate::landmark::Landmark;

/// Angle in degrees of the vector `p1 -> p2` in the image plane.
///
/// Range is (-180, 180]. Identical points give 0.
pub fn directional_angle(p1: &Landmark, p2: &Landmark) -> f64 {
    let degrees = (p2.y - p1.y).atan2(p2.x - p1.x).to_degrees();
    // atan2(-0.0, -x) lands on -180
    if degrees <= -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// Straight-line distance across x, y and z
pub fn euclidean_distance_3d(p1: &Landmark, p2: &Landmark) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    let dz = p1.z - p2.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Componentwise average of two landmarks.
///
/// Visibility is the lower of the two inputs.
pub fn midpoint(p1: &Landmark, p2: &Landmark) -> Landmark {
    Landmark {
        x: (p1.x + p2.x) / 2.0,
        y: (p1.y + p2.y) / 2.0,
        z: (p1.z + p2.z) / 2.0,
        visibility: p1.visibility.min(p2.visibility),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(x: f64, y: f64) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    /// Signed difference a - b folded into [-180, 180)
    fn angle_diff(a: f64, b: f64) -> f64 {
        (a - b + 180.0).rem_euclid(360.0) - 180.0
    }

    #[test]
    fn test_horizontal_angle() {
        assert_eq!(directional_angle(&point(0.4, 0.6), &point(0.6, 0.6)), 0.0);
        assert_eq!(directional_angle(&point(0.6, 0.6), &point(0.4, 0.6)), 180.0);
    }

    #[test]
    fn test_vertical_angle() {
        assert!((directional_angle(&point(0.5, 0.5), &point(0.5, 0.7)) - 90.0).abs() < 1e-9);
        assert!((directional_angle(&point(0.5, 0.7), &point(0.5, 0.5)) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_points_angle_is_zero() {
        let p = Landmark::new(0.3, 0.3, 0.9);
        assert_eq!(directional_angle(&p, &p), 0.0);
    }

    #[test]
    fn test_negative_zero_dy_maps_to_positive_half_turn() {
        let p1 = Landmark::new(0.6, 0.0, 0.0);
        let p2 = Landmark::new(0.4, -0.0, 0.0);
        assert_eq!(directional_angle(&p1, &p2), 180.0);
    }

    #[test]
    fn test_distance_uses_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.0, 0.4);
        assert!((euclidean_distance_3d(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_midpoint() {
        let a = Landmark::new(0.4, 0.6, 0.0).with_visibility(0.9);
        let b = Landmark::new(0.6, 0.6, 0.2).with_visibility(0.7);
        let mid = midpoint(&a, &b);
        assert!((mid.x - 0.5).abs() < 1e-12);
        assert!((mid.y - 0.6).abs() < 1e-12);
        assert!((mid.z - 0.1).abs() < 1e-12);
        assert_eq!(mid.visibility, 0.7);
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(x1 in -2.0..2.0f64, y1 in -2.0..2.0f64, x2 in -2.0..2.0f64, y2 in -2.0..2.0f64) {
            let angle = directional_angle(&point(x1, y1), &point(x2, y2));
            prop_assert!(angle > -180.0 && angle <= 180.0);
        }

        #[test]
        fn prop_swapped_arguments_differ_by_half_turn(x1 in -2.0..2.0f64, y1 in -2.0..2.0f64, x2 in -2.0..2.0f64, y2 in -2.0..2.0f64) {
            let (p1, p2) = (point(x1, y1), point(x2, y2));
            prop_assume!(p1 != p2);
            let forward = directional_angle(&p1, &p2);
            let backward = directional_angle(&p2, &p1);
            prop_assert!((angle_diff(backward, forward).abs() - 180.0).abs() < 1e-9);
        }

        #[test]
        fn prop_distance_symmetric_and_non_negative(x1 in -2.0..2.0f64, z1 in -2.0..2.0f64, x2 in -2.0..2.0f64, z2 in -2.0..2.0f64) {
            let a = Landmark::new(x1, 0.1, z1);
            let b = Landmark::new(x2, 0.2, z2);
            let d = euclidean_distance_3d(&a, &b);
            prop_assert!(d >= 0.0);
            prop_assert_eq!(d, euclidean_distance_3d(&b, &a));
        }
    }
}
