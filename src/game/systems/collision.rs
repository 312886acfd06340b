//! Circle-circle contact detection on the ground plane

use crate::util::vec3::Vec3;

/// Fallback contact normal for coincident centres
pub const FALLBACK_NORMAL: Vec3 = Vec3::X;

/// Result of a pairwise overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Bodies overlap
    pub collided: bool,
    /// Unit vector on the X/Z plane pointing from B to A
    pub normal: Vec3,
    /// `max(0, radius_a + radius_b - distance)`
    pub penetration: f32,
    /// Horizontal centre distance
    pub distance: f32,
}

/// Unit normal from `pos_b` toward `pos_a` with its horizontal length.
/// Coincident centres yield [`FALLBACK_NORMAL`].
#[inline]
pub fn contact_normal(pos_a: Vec3, pos_b: Vec3) -> (Vec3, f32) {
    let offset = (pos_a - pos_b).horizontal();
    let distance = offset.length();
    if distance > 0.0 {
        (offset * (1.0 / distance), distance)
    } else {
        (FALLBACK_NORMAL, 0.0)
    }
}

/// Test two circles for overlap. Height is ignored.
pub fn test(pos_a: Vec3, radius_a: f32, pos_b: Vec3, radius_b: f32) -> Contact {
    let (normal, distance) = contact_normal(pos_a, pos_b);
    let reach = radius_a + radius_b;
    Contact {
        collided: distance < reach,
        normal,
        penetration: (reach - distance).max(0.0),
        distance,
    }
}

/// Same test with A's radius inflated by `padding`.
/// Used only to drive cosmetic dodge reactions.
pub fn near_miss(pos_a: Vec3, radius_a: f32, pos_b: Vec3, radius_b: f32, padding: f32) -> Contact {
    test(pos_a, radius_a + padding, pos_b, radius_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_separated_circles() {
        let c = test(Vec3::new(3.0, 0.5, 0.0), 0.8, Vec3::new(-3.0, 0.5, 0.0), 0.8);
        assert!(!c.collided);
        assert_eq!(c.penetration, 0.0);
        assert!((c.distance - 6.0).abs() < 1e-6);
        assert!(c.normal.approx_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_overlapping_circles() {
        let c = test(Vec3::new(0.0, 0.5, 1.0), 0.8, Vec3::new(0.0, 0.5, 0.0), 0.8);
        assert!(c.collided);
        assert!((c.penetration - 0.6).abs() < 1e-6);
        // Normal points from B to A
        assert!(c.normal.approx_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_touching_is_not_collision() {
        let c = test(Vec3::new(1.6, 0.0, 0.0), 0.8, Vec3::ZERO, 0.8);
        assert!(!c.collided);
        assert!(c.penetration.abs() < 1e-6);
    }

    #[test]
    fn test_coincident_centres_use_fallback() {
        let p = Vec3::new(2.0, 0.5, 2.0);
        let c = test(p, 0.8, p, 0.8);
        assert!(c.collided);
        assert_eq!(c.normal, FALLBACK_NORMAL);
        assert!((c.penetration - 1.6).abs() < 1e-6);
        assert_eq!(c.distance, 0.0);
    }

    #[test]
    fn test_height_is_ignored() {
        let c = test(Vec3::new(1.0, 5.0, 0.0), 0.8, Vec3::new(0.0, 0.0, 0.0), 0.8);
        assert!(c.collided);
        assert!((c.distance - 1.0).abs() < 1e-6);
        assert_eq!(c.normal.y, 0.0);
    }

    #[test]
    fn test_near_miss_padding() {
        let a = Vec3::new(2.5, 0.5, 0.0);
        let b = Vec3::new(0.0, 0.5, 0.0);
        assert!(!test(a, 0.8, b, 0.8).collided);
        assert!(near_miss(a, 0.8, b, 0.8, 1.5).collided);
    }

    proptest! {
        #[test]
        fn prop_overlap_reports_penetration(
            ax in -10.0f32..10.0, az in -10.0f32..10.0,
            angle in 0.0f32..std::f32::consts::TAU,
            ra in 0.1f32..2.0, rb in 0.1f32..2.0,
            frac in 0.01f32..0.99,
        ) {
            let distance = (ra + rb) * frac;
            let a = Vec3::new(ax, 0.5, az);
            let b = a + Vec3::planar(angle.cos(), angle.sin()) * distance;
            let c = test(a, ra, b, rb);
            let actual = a.horizontal_distance_to(b);
            prop_assert!(c.collided);
            prop_assert!((c.penetration - (ra + rb - actual)).abs() < 1e-4);
            prop_assert!((c.normal.length() - 1.0).abs() < 1e-4);
            // B to A
            prop_assert!(c.normal.dot(a - b) >= 0.0);
        }

        #[test]
        fn prop_penetration_never_negative(
            ax in -10.0f32..10.0, az in -10.0f32..10.0,
            bx in -10.0f32..10.0, bz in -10.0f32..10.0,
        ) {
            let c = test(Vec3::planar(ax, az), 0.8, Vec3::planar(bx, bz), 0.8);
            prop_assert!(c.penetration >= 0.0);
            prop_assert_eq!(c.collided, c.penetration > 0.0);
        }
    }
}
