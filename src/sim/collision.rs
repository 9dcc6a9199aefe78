//! Collision detection for round ships against each other and against
//! rectangular platforms
//!
//! Everything here is a pure query. Applying damage, shields, sounds and
//! landing rules is the tick's job.

use glam::IVec2;

use super::geometry::{Rect, closest_feature, distance};
use super::vector::Vector2D;
use crate::consts::{LANDING_SPEED, MIN_IMPULSE};

/// Result of a ship-platform collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the platform outline
    pub point: IVec2,
    /// Surface normal at `point`, pointing away from the platform
    pub normal: Vector2D,
    /// Distance from the ship center to `point`
    pub distance: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: IVec2::ZERO,
            normal: Vector2D::ZERO,
            distance: f64::INFINITY,
        }
    }
}

/// Two circles touch or overlap
#[inline]
pub fn circles_touch(c1: IVec2, r1: f64, c2: IVec2, r2: f64) -> bool {
    distance(c1, c2) <= r1 + r2
}

/// Impulse exchanged by two equal-mass ships colliding elastically.
///
/// Momentum is only exchanged along the line through both centers. The
/// first ship's motion loses the returned force, the second gains it.
/// Forces weaker than [`MIN_IMPULSE`] are boosted to it, so touching ships
/// always push apart (unless their centers coincide).
pub fn ship_impulse(c1: IVec2, v1: Vector2D, c2: IVec2, v2: Vector2D) -> Vector2D {
    let n = Vector2D::between(c1, c2).to_length(1.0);
    let a1 = v1.dot(n);
    let a2 = v2.dot(n);

    let force = n * (a1 - a2);
    if force.norm() < MIN_IMPULSE {
        force.to_length(MIN_IMPULSE)
    } else {
        force
    }
}

/// Damage a ship takes from an impulse or impact speed: the magnitude with
/// the fraction dropped
#[inline]
pub fn impact_damage(v: Vector2D) -> i32 {
    v.norm() as i32
}

/// Check a ship's circle against a platform outline.
///
/// Bounding boxes are tested first; only overlapping boxes get the exact
/// closest-point test.
pub fn ship_platform_collision(
    center: IVec2,
    radius: f64,
    ship_bounds: &Rect,
    platform: &Rect,
) -> CollisionResult {
    if !ship_bounds.intersects(platform) {
        return CollisionResult::miss();
    }

    match closest_feature(&platform.vertices(), center) {
        Some(feature) if feature.distance <= radius => CollisionResult {
            hit: true,
            point: feature.point,
            normal: feature.normal,
            distance: feature.distance,
        },
        _ => CollisionResult::miss(),
    }
}

/// A touching ship sets down gently if it is slow and hovering over the
/// platform's top surface
pub fn is_landing(center: IVec2, motion: Vector2D, platform: &Rect) -> bool {
    motion.norm() < LANDING_SPEED
        && center.y < platform.top()
        && center.x > platform.left()
        && center.x < platform.right()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vector2D, normal: Vector2D) -> Vector2D {
    velocity.mirror(normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_head_on_collision() {
        let c1 = IVec2::new(100, 100);
        let c2 = IVec2::new(120, 100);
        assert!(circles_touch(c1, 15.0, c2, 15.0));

        let v1 = Vector2D::new(1.0, 0.0);
        let v2 = Vector2D::new(-1.0, 0.0);
        let force = ship_impulse(c1, v1, c2, v2);
        assert_eq!(force, Vector2D::new(2.0, 0.0));
        assert_eq!(v1 - force, Vector2D::new(-1.0, 0.0));
        assert_eq!(v2 + force, Vector2D::new(1.0, 0.0));
        assert_eq!(impact_damage(force), 2);
    }

    #[test]
    fn test_weak_impulse_boosted_to_minimum() {
        let c1 = IVec2::new(0, 0);
        let c2 = IVec2::new(10, 0);
        let force = ship_impulse(c1, Vector2D::new(0.1, 0.0), c2, Vector2D::ZERO);
        assert!((force.norm() - MIN_IMPULSE).abs() < 1e-9);
        // Still pushes the first ship back
        assert!(force.x() > 0.0);
    }

    #[test]
    fn test_coincident_centers_give_no_impulse() {
        let c = IVec2::new(5, 5);
        let force = ship_impulse(c, Vector2D::new(1.0, 0.0), c, Vector2D::ZERO);
        assert_eq!(force, Vector2D::ZERO);
    }

    #[test]
    fn test_separated_ships_do_not_touch() {
        assert!(!circles_touch(IVec2::new(0, 0), 15.0, IVec2::new(31, 0), 15.0));
        assert!(circles_touch(IVec2::new(0, 0), 15.0, IVec2::new(30, 0), 15.0));
    }

    #[test]
    fn test_impact_damage_truncates() {
        assert_eq!(impact_damage(Vector2D::new(0.0, 2.9)), 2);
        assert_eq!(impact_damage(Vector2D::new(0.0, 0.5)), 0);
    }

    #[test]
    fn test_ship_above_platform_hits_top() {
        let platform = Rect::new(100, 200, 80, 12);
        let ship = Rect::new(125, 172, 30, 30);
        let result = ship_platform_collision(ship.center(), 15.0, &ship, &platform);
        assert!(result.hit);
        assert_eq!(result.point, IVec2::new(140, 200));
        assert_eq!(result.normal, Vector2D::new(0.0, -1.0));
        assert!((result.distance - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_ship_far_from_platform_misses() {
        let platform = Rect::new(100, 200, 80, 12);
        let ship = Rect::new(300, 50, 30, 30);
        assert!(!ship_platform_collision(ship.center(), 15.0, &ship, &platform).hit);
    }

    #[test]
    fn test_box_overlap_near_corner_can_still_miss() {
        // Boxes overlap at the corner but the circle does not reach it
        let platform = Rect::new(100, 200, 80, 12);
        let ship = Rect::new(72, 172, 30, 30);
        let result = ship_platform_collision(ship.center(), 15.0, &ship, &platform);
        assert!(!result.hit);
    }

    #[test]
    fn test_landing_predicate() {
        let platform = Rect::new(100, 200, 80, 12);
        let slow = Vector2D::new(0.0, 1.5);
        assert!(is_landing(IVec2::new(140, 187), slow, &platform));
        // Too fast
        assert!(!is_landing(IVec2::new(140, 187), Vector2D::new(0.0, 2.0), &platform));
        // Not over the top surface
        assert!(!is_landing(IVec2::new(140, 215), slow, &platform));
        // Outside the horizontal span
        assert!(!is_landing(IVec2::new(100, 187), slow, &platform));
        assert!(!is_landing(IVec2::new(180, 187), slow, &platform));
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vector2D::new(3.0, 5.0), Vector2D::new(0.0, -1.0));
        assert_eq!(reflected, Vector2D::new(3.0, -5.0));
    }

    proptest! {
        #[test]
        fn prop_impulse_symmetric(
            x1 in -50i32..50, y1 in -50i32..50,
            x2 in -50i32..50, y2 in -50i32..50,
            vx1 in -10.0f64..10.0, vy1 in -10.0f64..10.0,
            vx2 in -10.0f64..10.0, vy2 in -10.0f64..10.0,
        ) {
            let c1 = IVec2::new(x1, y1);
            let c2 = IVec2::new(x2, y2);
            let v1 = Vector2D::new(vx1, vy1);
            let v2 = Vector2D::new(vx2, vy2);

            let forward = ship_impulse(c1, v1, c2, v2);
            let swapped = ship_impulse(c2, v2, c1, v1);
            prop_assert!((forward.x() + swapped.x()).abs() < 1e-9);
            prop_assert!((forward.y() + swapped.y()).abs() < 1e-9);
            prop_assert_eq!(impact_damage(forward), impact_damage(swapped));
        }

        #[test]
        fn prop_impulse_at_least_minimum(
            x in 1i32..60, y in -60i32..60,
            vx1 in -10.0f64..10.0, vy1 in -10.0f64..10.0,
            vx2 in -10.0f64..10.0, vy2 in -10.0f64..10.0,
        ) {
            let force = ship_impulse(
                IVec2::ZERO,
                Vector2D::new(vx1, vy1),
                IVec2::new(x, y),
                Vector2D::new(vx2, vy2),
            );
            let min = MIN_IMPULSE - 1e-9;
            prop_assert!(force.norm() >= min || force == Vector2D::ZERO);
        }
    }
}
