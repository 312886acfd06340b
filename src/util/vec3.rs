use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// 3D vector for simulation state
///
/// The duel plays out on the horizontal X/Z plane. Y is carried for the
/// presentation layer (body height) and is never changed by the physics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vector on the ground plane (y = 0)
    #[inline]
    pub const fn planar(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn distance_to(&self, other: Vec3) -> f32 {
        (*self - other).length()
    }

    /// Projection onto the X/Z plane
    #[inline]
    pub fn horizontal(&self) -> Self {
        Self::planar(self.x, self.z)
    }

    #[inline]
    pub fn horizontal_length(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Distance on the X/Z plane, ignoring height
    #[inline]
    pub fn horizontal_distance_to(&self, other: Vec3) -> f32 {
        (*self - other).horizontal_length()
    }

    /// Unit vector on the X/Z plane pointing from `self` toward `target`.
    /// Returns zero when the two points share the same ground position.
    pub fn horizontal_direction_to(&self, target: Vec3) -> Self {
        (target - *self).horizontal().normalize()
    }

    /// Rotation about the vertical axis that faces `target`.
    /// Zero yaw looks down +Z; positive yaw turns toward +X.
    pub fn yaw_toward(&self, target: Vec3) -> f32 {
        let dir = self.horizontal_direction_to(target);
        dir.x.atan2(dir.z)
    }

    pub fn lerp(&self, other: Vec3, t: f32) -> Self {
        *self + (other - *self) * t
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Check if vector is approximately equal to another
    pub fn approx_eq(&self, other: Vec3, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        rhs * self
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_length() {
        let v = Vec3::new(2.0, 3.0, 6.0);
        assert!(approx_eq(v.length(), 7.0));
        assert!(approx_eq(v.length_sq(), 49.0));
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_normalize() {
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!(approx_eq(n.length(), 1.0));
        assert!(approx_eq(n.x, 0.6));
        assert!(approx_eq(n.z, 0.8));
    }

    #[test]
    fn test_horizontal_ignores_height() {
        let a = Vec3::new(0.0, 0.5, 0.0);
        let b = Vec3::new(3.0, 10.0, 4.0);
        assert!(approx_eq(a.horizontal_distance_to(b), 5.0));
        assert_eq!(b.horizontal(), Vec3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn test_horizontal_direction_coincident() {
        let a = Vec3::new(1.0, 0.5, 1.0);
        let b = Vec3::new(1.0, 2.0, 1.0);
        assert_eq!(a.horizontal_direction_to(b), Vec3::ZERO);
    }

    #[test]
    fn test_yaw_toward() {
        let origin = Vec3::ZERO;
        assert!(approx_eq(origin.yaw_toward(Vec3::new(0.0, 0.0, 5.0)), 0.0));
        assert!(approx_eq(origin.yaw_toward(Vec3::new(5.0, 0.0, 0.0)), PI / 2.0));
        assert!(approx_eq(origin.yaw_toward(Vec3::new(-5.0, 0.0, 0.0)), -PI / 2.0));
    }

    #[test]
    fn test_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -5.0, 6.0);
        assert!(approx_eq(a.dot(b), 12.0));
    }

    #[test]
    fn test_operators() {
        let mut a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(a + b, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(a - b, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));

        a += b;
        assert_eq!(a, Vec3::new(1.5, 2.5, 3.5));
        a -= b;
        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
        a *= 0.5;
        assert_eq!(a, Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_lerp_edges() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 10.0, 10.0);
        assert!(a.lerp(b, 0.0).approx_eq(a, EPSILON));
        assert!(a.lerp(b, 1.0).approx_eq(b, EPSILON));
        assert!(a.lerp(b, 0.5).approx_eq(Vec3::new(5.0, 5.0, 5.0), EPSILON));
    }

    #[test]
    fn test_is_finite() {
        assert!(Vec3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Vec3::new(0.0, 0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_serde() {
        let v = Vec3::new(1.5, 0.5, -2.5);
        let json = serde_json::to_string(&v).unwrap();
        let decoded: Vec3 = serde_json::from_str(&json).unwrap();
        assert_eq!(v, decoded);
    }
}
