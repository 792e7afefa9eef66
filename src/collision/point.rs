//! Point against shape queries.
//!
//! The point plays the role of shape A: subtracting the MTV from the point
//! moves it out of the shape.

use crate::collision::result::CollisionResult;
use crate::math::Vec2;
use crate::shapes::{BoxShape, Circle, Polygon};

/// Circle radius padded by `tolerance`, strict comparison.
pub fn point_in_circle(point: Vec2, circle: &Circle, tolerance: f64) -> bool {
    let padded = tolerance + circle.radius();
    point.distance_squared(circle.position()) < padded * padded
}

pub fn point_to_circle(point: Vec2, circle: &Circle, tolerance: f64) -> Option<CollisionResult> {
    let distance_squared = point.distance_squared(circle.position());
    let padded = tolerance + circle.radius();
    if distance_squared >= padded * padded {
        return None;
    }

    let normal = (point - circle.position()).normalize_or(Vec2::UP);
    let depth = padded - distance_squared.sqrt();
    Some(CollisionResult::new(
        normal,
        normal * -depth,
        circle.position() + normal * circle.radius(),
    ))
}

/// Unrotated box; the border is outside.
pub fn point_to_box(point: Vec2, shape: &BoxShape) -> Option<CollisionResult> {
    if !shape.contains_point(point) {
        return None;
    }

    let (border, normal) = shape.bounding_box().closest_point_on_border_with_normal(point);
    Some(CollisionResult::new(normal, point - border, border))
}

pub fn point_to_polygon(point: Vec2, polygon: &Polygon) -> Option<CollisionResult> {
    if !polygon.contains_point(point) {
        return None;
    }

    let local = point - polygon.position();
    let closest = polygon.closest_point_to(local);
    Some(CollisionResult::new(
        closest.edge_normal,
        local - closest.point,
        closest.point + polygon.position(),
    ))
}
