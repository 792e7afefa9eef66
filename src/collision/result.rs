use std::fmt;

use crate::math::scalar;
use crate::math::vec2::Vec2;

/// Contact data for a collision between shape A (the one being tested) and shape B.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    /// Unit normal pointing from B towards A.
    pub normal: Vec2,
    /// Subtracting this from A's position separates the shapes.
    pub minimum_translation_vector: Vec2,
    /// A contact point in world coordinates.
    pub point: Vec2,
}

impl CollisionResult {
    pub fn new(normal: Vec2, minimum_translation_vector: Vec2, point: Vec2) -> Self {
        Self {
            normal,
            minimum_translation_vector,
            point,
        }
    }

    /// Flips the result so it describes the pair in the opposite order.
    pub fn invert_result(&mut self) {
        self.normal = -self.normal;
        self.minimum_translation_vector = -self.minimum_translation_vector;
    }

    pub fn inverted(mut self) -> Self {
        self.invert_result();
        self
    }

    /// Replaces the horizontal part of the response with a vertical-only push
    /// when A was moving against the normal's horizontal direction.
    ///
    /// Keeps characters from being shoved sideways when landing on slopes.
    /// A horizontal normal (`normal.y == 0`) has no vertical component to
    /// push along, so the MTV is left as is.
    pub fn remove_horizontal_translation(&mut self, delta_movement: Vec2) {
        let n = self.normal;
        if scalar::sign(n.x) != scalar::sign(delta_movement.x) || (delta_movement.x == 0.0 && n.x != 0.0) {
            if n.y == 0.0 {
                return;
            }
            let response_distance = self.minimum_translation_vector.magnitude();
            let fix = response_distance / n.y;

            if n.x.abs() != 1.0 && fix.abs() < (delta_movement.y * 3.0).abs() {
                self.minimum_translation_vector = Vec2::new(0.0, -fix);
            }
        }
    }
}

impl fmt::Display for CollisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "normal: ({}, {}), mtv: ({}, {})",
            self.normal.x, self.normal.y, self.minimum_translation_vector.x, self.minimum_translation_vector.y
        )
    }
}

/// Where a segment first touches a shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RaycastHit {
    /// Position of the hit along the segment, 0 at the start and 1 at the end.
    pub fraction: f64,
    /// Distance from the segment start.
    pub distance: f64,
    pub point: Vec2,
    /// Surface normal at the hit.
    pub normal: Vec2,
}

impl RaycastHit {
    pub fn new(fraction: f64, distance: f64, point: Vec2, normal: Vec2) -> Self {
        Self {
            fraction,
            distance,
            point,
            normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_result() {
        let mut r = CollisionResult::new(Vec2::new(0.0, 1.0), Vec2::new(0.0, -2.0), Vec2::new(3.0, 3.0));
        r.invert_result();
        assert_eq!(r.normal, Vec2::new(0.0, -1.0));
        assert_eq!(r.minimum_translation_vector, Vec2::new(0.0, 2.0));
        assert_eq!(r.point, Vec2::new(3.0, 3.0));
        assert_eq!(r.inverted().normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_remove_horizontal_translation_on_slope() {
        let normal = Vec2::new(-1.0, -1.0).normalize();
        let mut r = CollisionResult::new(normal, normal * -2.0, Vec2::ZERO);
        // moving right and down into a slope whose normal leans left
        r.remove_horizontal_translation(Vec2::new(1.0, 5.0));

        let expected_fix = 2.0 / normal.y;
        assert_eq!(r.minimum_translation_vector.x, 0.0);
        assert!((r.minimum_translation_vector.y - -expected_fix).abs() < 1e-12);
    }

    #[test]
    fn test_remove_horizontal_translation_same_direction_untouched() {
        let normal = Vec2::new(1.0, -1.0).normalize();
        let mtv = normal * -2.0;
        let mut r = CollisionResult::new(normal, mtv, Vec2::ZERO);
        r.remove_horizontal_translation(Vec2::new(1.0, 5.0));
        assert_eq!(r.minimum_translation_vector, mtv);
    }

    #[test]
    fn test_remove_horizontal_translation_wall_untouched() {
        let mut r = CollisionResult::new(Vec2::new(-1.0, 0.0), Vec2::new(1.5, 0.0), Vec2::ZERO);
        r.remove_horizontal_translation(Vec2::new(2.0, 0.0));
        assert_eq!(r.minimum_translation_vector, Vec2::new(1.5, 0.0));
    }

    #[test]
    fn test_remove_horizontal_translation_small_vertical_motion() {
        let normal = Vec2::new(-1.0, -1.0).normalize();
        let mtv = normal * -2.0;
        let mut r = CollisionResult::new(normal, mtv, Vec2::ZERO);
        // |fix| ~ 2.83 is not below |0.1 * 3|
        r.remove_horizontal_translation(Vec2::new(1.0, 0.1));
        assert_eq!(r.minimum_translation_vector, mtv);
    }

    #[test]
    fn test_display() {
        let r = CollisionResult::new(Vec2::new(0.0, 1.0), Vec2::new(0.0, 2.0), Vec2::ZERO);
        assert_eq!(r.to_string(), "normal: (0, 1), mtv: (0, 2)");
    }
}
