//! Immutable 2D vector for motion and geometry
//!
//! Every operation returns a new value. Storage is a `glam::DVec2`, but the
//! game relies on a few operations with specific edge behavior
//! (`to_length` leaves the zero vector alone), so they live here.

use std::ops::{Add, Mul, Neg, Sub};

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

/// A vector on the plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D(DVec2);

impl Vector2D {
    pub const ZERO: Self = Self(DVec2::ZERO);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Vector pointing from `from` to `to`
    #[inline]
    pub fn between(to: IVec2, from: IVec2) -> Self {
        Self::new(f64::from(to.x - from.x), f64::from(to.y - from.y))
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.0.y
    }

    /// Component-wise product
    #[inline]
    pub fn multiply(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.0.dot(other.0)
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.0.length()
    }

    /// Alias of [`Vector2D::norm`]
    #[inline]
    pub fn length(self) -> f64 {
        self.norm()
    }

    /// Rescale to `length`, keeping direction. The zero vector has no
    /// direction and is returned unchanged.
    pub fn to_length(self, length: f64) -> Self {
        let current = self.norm();
        if current == 0.0 {
            self
        } else {
            self * (length / current)
        }
    }

    /// Reflect about `normal`: v' = v - 2(v·n)n
    ///
    /// `normal` is expected to be unit length.
    pub fn mirror(self, normal: Self) -> Self {
        self - normal * (2.0 * self.dot(normal))
    }

    /// Rotate counter-clockwise by `radians`
    pub fn rotate(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos * self.x() - sin * self.y(), sin * self.x() + cos * self.y())
    }

    #[inline]
    pub fn negate(self) -> Self {
        -self
    }

    /// Angle from the positive x axis, in radians
    #[inline]
    pub fn angle(self) -> f64 {
        self.y().atan2(self.x())
    }

    /// Components rounded to the nearest pixel
    #[inline]
    pub fn round_to_pixels(self) -> IVec2 {
        IVec2::new(self.x().round() as i32, self.y().round() as i32)
    }

    /// Components truncated toward zero, like an integer cast
    #[inline]
    pub fn truncate_to_pixels(self) -> IVec2 {
        IVec2::new(self.x() as i32, self.y() as i32)
    }
}

impl Add for Vector2D {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self(self.0 * scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<DVec2> for Vector2D {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl From<Vector2D> for DVec2 {
    fn from(v: Vector2D) -> Self {
        v.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn close(a: Vector2D, b: Vector2D) -> bool {
        (a.x() - b.x()).abs() < 1e-6 && (a.y() - b.y()).abs() < 1e-6
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector2D::new(1.0, 2.0);
        let b = Vector2D::new(3.0, -4.0);
        assert_eq!(a + b, Vector2D::new(4.0, -2.0));
        assert_eq!(a - b, Vector2D::new(-2.0, 6.0));
        assert_eq!(a * 2.0, Vector2D::new(2.0, 4.0));
        assert_eq!(a.multiply(b), Vector2D::new(3.0, -8.0));
        assert_eq!(a.dot(b), -5.0);
        assert_eq!(b.norm(), 5.0);
        assert_eq!(a.negate(), Vector2D::new(-1.0, -2.0));
    }

    #[test]
    fn test_to_length_zero_vector_unchanged() {
        assert_eq!(Vector2D::ZERO.to_length(1.0), Vector2D::ZERO);
    }

    #[test]
    fn test_mirror_off_floor() {
        // Falling onto a floor whose normal points up
        let v = Vector2D::new(3.0, 4.0);
        let reflected = v.mirror(Vector2D::new(0.0, -1.0));
        assert!(close(reflected, Vector2D::new(3.0, -4.0)));
    }

    #[test]
    fn test_rotate_and_angle() {
        let v = Vector2D::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert!(close(v, Vector2D::new(0.0, 1.0)));
        assert!((v.angle() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_between_points() {
        let v = Vector2D::between(IVec2::new(5, 7), IVec2::new(2, 3));
        assert_eq!(v, Vector2D::new(3.0, 4.0));
    }

    #[test]
    fn test_pixel_conversions() {
        let v = Vector2D::new(1.5, -1.6);
        assert_eq!(v.round_to_pixels(), IVec2::new(2, -2));
        assert_eq!(v.truncate_to_pixels(), IVec2::new(1, -1));
    }

    proptest! {
        #[test]
        fn prop_to_length_hits_target(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            target in 0.001f64..100.0,
        ) {
            let v = Vector2D::new(x, y);
            prop_assume!(v.norm() > 1e-6);
            prop_assert!((v.to_length(target).norm() - target).abs() < 1e-6);
        }

        #[test]
        fn prop_mirror_is_involution(
            x in -100.0f64..100.0,
            y in -100.0f64..100.0,
            angle in -3.2f64..3.2,
        ) {
            let v = Vector2D::new(x, y);
            let n = Vector2D::new(angle.cos(), angle.sin());
            prop_assert!(close(v.mirror(n).mirror(n), v));
        }

        #[test]
        fn prop_mirror_preserves_length(
            x in -100.0f64..100.0,
            y in -100.0f64..100.0,
            angle in -3.2f64..3.2,
        ) {
            let v = Vector2D::new(x, y);
            let n = Vector2D::new(angle.cos(), angle.sin());
            prop_assert!((v.mirror(n).norm() - v.norm()).abs() < 1e-6);
        }
    }
}
