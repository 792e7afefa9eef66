use crate::collision::detection::intersect_line_segments;
use crate::collision::result::RaycastHit;
use crate::math::Vec2;
use crate::shapes::{Circle, Polygon};

/// First point where the segment `start..end` enters the circle.
///
/// A segment starting inside the circle hits at fraction 0.
pub fn line_to_circle(start: Vec2, end: Vec2, circle: &Circle) -> Option<RaycastHit> {
    let delta = end - start;
    let length = delta.magnitude();
    if length == 0.0 {
        return circle.contains_point(start).then(|| {
            let normal = (start - circle.position()).normalize_or(Vec2::UP);
            RaycastHit::new(0.0, 0.0, start, normal)
        });
    }

    let direction = delta / length;
    let m = start - circle.position();
    let b = m.dot(direction);
    let c = m.dot(m) - circle.radius() * circle.radius();

    // outside and pointing away
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let distance = (-b - discriminant.sqrt()).max(0.0);
    if distance > length {
        return None;
    }

    let point = start + direction * distance;
    let normal = (point - circle.position()).normalize_or(-direction);
    Some(RaycastHit::new(distance / length, distance, point, normal))
}

/// Nearest edge crossing of the segment `start..end`, using that edge's normal.
///
/// A segment starting inside the polygon hits at fraction 0 with the normal
/// of the closest edge.
pub fn line_to_polygon(start: Vec2, end: Vec2, polygon: &Polygon) -> Option<RaycastHit> {
    if polygon.contains_point(start) {
        let closest = polygon.closest_point_to(start - polygon.position());
        return Some(RaycastHit::new(0.0, 0.0, start, closest.edge_normal));
    }

    let position = polygon.position();
    let points = polygon.points();
    let normals = polygon.edge_normals();
    let n = points.len();

    let mut best: Option<(f64, Vec2, Vec2)> = None;
    for i in 0..n {
        let a = points[i] + position;
        let b = points[(i + 1) % n] + position;
        if let Some((point, t, _)) = intersect_line_segments(start, end, a, b) {
            if best.map_or(true, |(best_t, _, _)| t < best_t) {
                best = Some((t, point, normals[i]));
            }
        }
    }

    let length = (end - start).magnitude();
    best.map(|(t, point, normal)| RaycastHit::new(t, t * length, point, normal))
}
