use crate::collision::result::CollisionResult;
use crate::math::{Rect, Vec2};
use crate::shapes::{BoxShape, Circle, Polygon};

/// Finds the point on a line segment closest to a given point.
/// Returns the closest point and the parameter `t` (0 <= t <= 1) along the segment.
pub fn closest_point_on_segment(segment_a: Vec2, segment_b: Vec2, point: Vec2) -> (Vec2, f64) {
    let segment_vec = segment_b - segment_a;
    let length_sq = segment_vec.magnitude_squared();
    if length_sq < 1e-12 {
        return (segment_a, 0.0);
    }

    let t = ((point - segment_a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    (segment_a + segment_vec * t, t)
}

/// Intersection of two segments, with the parameters `(t, u)` along each.
/// Parallel segments never intersect, even when collinear and overlapping.
pub fn intersect_line_segments(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<(Vec2, f64, f64)> {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let delta_start = b1 - a1;

    let denominator = d1.cross(d2);
    if denominator.abs() < 1e-10 {
        return None;
    }

    let t = delta_start.cross(d2) / denominator;
    let u = delta_start.cross(d1) / denominator;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((a1 + d1 * t, t, u))
    } else {
        None
    }
}

// --- Circle ---

pub fn circles_overlap(first: &Circle, second: &Circle) -> bool {
    let sum_of_radii = first.radius() + second.radius();
    first.position().distance_squared(second.position()) < sum_of_radii * sum_of_radii
}

/// Fallback normal for concentric circles: the larger circle is pushed along
/// +y, the smaller along -y. Equal radii fall back to +y in both orders.
fn concentric_normal(first: &Circle, second: &Circle) -> Vec2 {
    if first.radius() < second.radius() {
        -Vec2::UP
    } else {
        Vec2::UP
    }
}

/// Touching circles do not collide. See [`concentric_normal`] for the concentric case.
pub fn circle_to_circle(first: &Circle, second: &Circle) -> Option<CollisionResult> {
    let distance_squared = first.position().distance_squared(second.position());
    let sum_of_radii = first.radius() + second.radius();
    if distance_squared >= sum_of_radii * sum_of_radii {
        return None;
    }

    let normal = (first.position() - second.position()).normalize_or(concentric_normal(first, second));
    let depth = sum_of_radii - distance_squared.sqrt();
    Some(CollisionResult::new(
        normal,
        normal * -depth,
        second.position() + normal * second.radius(),
    ))
}

/// Circle against an unrotated box. Touching counts as overlapping.
pub fn circle_overlaps_box(circle: &Circle, shape: &BoxShape) -> bool {
    let bounds = shape.bounding_box();
    if bounds.contains(circle.position()) {
        return true;
    }
    let closest = bounds.closest_point_on_rect_to_point(circle.position());
    closest.distance_squared(circle.position()) <= circle.radius() * circle.radius()
}

pub fn circle_to_box(circle: &Circle, shape: &BoxShape) -> Option<CollisionResult> {
    let bounds = shape.bounding_box();
    let center = circle.position();
    let radius = circle.radius();
    let (closest, border_normal) = bounds.closest_point_on_border_with_normal(center);

    if bounds.contains(center) {
        let safe_place = closest + border_normal * radius;
        return Some(CollisionResult::new(border_normal, center - safe_place, closest));
    }

    let distance_squared = closest.distance_squared(center);
    if distance_squared == 0.0 {
        // centre sits on the border
        let normal = border_normal.normalize();
        return Some(CollisionResult::new(normal, normal * -radius, closest));
    }

    if distance_squared <= radius * radius {
        let offset = center - closest;
        let depth = offset.magnitude() - radius;
        let normal = offset.normalize();
        return Some(CollisionResult::new(normal, normal * depth, closest));
    }

    None
}

/// Also true when the circle's centre is inside the polygon, so a circle
/// swallowed by a large polygon still collides.
pub fn circle_overlaps_polygon(circle: &Circle, polygon: &Polygon) -> bool {
    let local = circle.position() - polygon.position();
    let closest = polygon.closest_point_to(local);
    closest.distance_squared <= circle.radius() * circle.radius() || polygon.contains_point(circle.position())
}

pub fn circle_to_polygon(circle: &Circle, polygon: &Polygon) -> Option<CollisionResult> {
    let radius = circle.radius();
    let local = circle.position() - polygon.position();
    let closest = polygon.closest_point_to(local);
    let center_inside = polygon.contains_point(circle.position());

    if closest.distance_squared > radius * radius && !center_inside {
        return None;
    }

    let normal = closest.edge_normal;
    let mtv = if center_inside {
        local - (closest.point + normal * radius)
    } else if closest.distance_squared == 0.0 {
        normal * -radius
    } else {
        let distance = closest.distance_squared.sqrt();
        -(local - closest.point) * ((radius - distance) / distance)
    };

    Some(CollisionResult::new(normal, mtv, closest.point + polygon.position()))
}

// --- Box ---

/// `first - second` in Minkowski terms; contains the origin iff the rectangles overlap.
pub fn minkowski_difference(first: &Rect, second: &Rect) -> Rect {
    Rect::from_position_size(first.position() - second.max(), first.size() + second.size())
}

/// Axis-aligned boxes. Edge contact is not a collision.
pub fn box_to_box(first: &BoxShape, second: &BoxShape) -> Option<CollisionResult> {
    let first_bounds = first.bounding_box();
    let second_bounds = second.bounding_box();
    let diff = minkowski_difference(&first_bounds, &second_bounds);
    if !diff.contains(Vec2::ZERO) {
        return None;
    }

    let mut mtv = diff.closest_point_on_bounds_to_origin();
    if mtv.is_zero() {
        return None;
    }

    // centred on each other along the chosen axis: the narrower box moves towards -axis
    if mtv.x != 0.0 && diff.left() == -diff.right() {
        mtv.x = if first_bounds.width < second_bounds.width { mtv.x.abs() } else { -mtv.x.abs() };
    }
    if mtv.y != 0.0 && diff.top() == -diff.bottom() {
        mtv.y = if first_bounds.height < second_bounds.height { mtv.y.abs() } else { -mtv.y.abs() };
    }

    let point = first_bounds
        .intersect_area(&second_bounds)
        .map(|area| area.center())
        .unwrap_or(first_bounds.center());
    Some(CollisionResult::new((-mtv).normalize(), mtv, point))
}

// --- Polygon ---

fn project(points: &[Vec2], offset: Vec2, axis: Vec2) -> (f64, f64) {
    let mut min_proj = f64::INFINITY;
    let mut max_proj = f64::NEG_INFINITY;
    for p in points {
        let projection = (*p + offset).dot(axis);
        min_proj = min_proj.min(projection);
        max_proj = max_proj.max(projection);
    }
    (min_proj, max_proj)
}

/// `axis` or `-axis`, whichever points into the half-plane `x > 0` (or `y > 0` on the y axis).
fn canonical_axis(axis: Vec2) -> Vec2 {
    if axis.x > 0.0 || (axis.x == 0.0 && axis.y > 0.0) {
        axis
    } else {
        -axis
    }
}

fn axis_precedes(a: Vec2, b: Vec2) -> bool {
    a.x < b.x || (a.x == b.x && a.y < b.y)
}

/// Smallest overlap over both polygons' edge normals, or `None` on a separating axis.
/// Returns `(depth, normal)` with the normal pointing from `second` towards `first`.
///
/// Axes are compared in canonical orientation and equal depths are settled by
/// axis order, so swapping the arguments only flips the normal.
fn min_separation(first: &Polygon, second: &Polygon) -> Option<(f64, Vec2)> {
    let first_points = first.points();
    let second_points = second.points();
    let first_normals = first.edge_normals();
    let second_normals = second.edge_normals();

    let mut best: Option<(f64, Vec2, Vec2)> = None;
    for &edge_normal in first_normals.iter().chain(second_normals.iter()) {
        if edge_normal.is_zero() {
            continue;
        }
        let axis = canonical_axis(edge_normal);

        let (min_a, max_a) = project(&first_points, first.position(), axis);
        let (min_b, max_b) = project(&second_points, second.position(), axis);
        let first_below = max_a - min_b;
        let first_above = max_b - min_a;
        if first_below <= 0.0 || first_above <= 0.0 {
            return None;
        }

        // equal overlaps both ways: push the narrower interval out along -axis
        let first_pushed_down = if first_below == first_above {
            max_a - min_a < max_b - min_b
        } else {
            first_below < first_above
        };
        let (overlap, normal) = if first_pushed_down {
            (first_below, -axis)
        } else {
            (first_above, axis)
        };

        let better = match best {
            None => true,
            Some((depth, _, best_axis)) => overlap < depth || (overlap == depth && axis_precedes(axis, best_axis)),
        };
        if better {
            best = Some((overlap, normal, axis));
        }
    }
    best.map(|(depth, normal, _)| (depth, normal))
}

/// Separating axis test for convex polygons. Touching is not overlapping.
pub fn polygons_overlap(first: &Polygon, second: &Polygon) -> bool {
    min_separation(first, second).is_some()
}

pub fn polygon_to_polygon(first: &Polygon, second: &Polygon) -> Option<CollisionResult> {
    let (depth, normal) = min_separation(first, second)?;
    let point = first.farthest_point_in_direction(-normal) + first.position();
    Some(CollisionResult::new(normal, normal * -depth, point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const EPSILON: f64 = 1e-9;

    fn circle(radius: f64, x: f64, y: f64) -> Circle {
        let mut c = Circle::new(radius).unwrap();
        c.set_position(Vec2::new(x, y));
        c
    }

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> BoxShape {
        let mut b = BoxShape::new(w, h).unwrap();
        b.set_position(Vec2::new(x, y));
        b
    }

    fn square_polygon(x: f64, y: f64, size: f64) -> Polygon {
        let mut p = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(size, 0.0),
            Vec2::new(size, size),
            Vec2::new(0.0, size),
        ])
        .unwrap();
        p.set_position(Vec2::new(x, y));
        p
    }

    #[test]
    fn test_closest_point_on_segment() {
        let (p, t) = closest_point_on_segment(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(1.0, 3.0));
        assert_eq!(p, Vec2::new(1.0, 0.0));
        assert!((t - 0.25).abs() < EPSILON);

        let (p, t) = closest_point_on_segment(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(9.0, 1.0));
        assert_eq!(p, Vec2::new(4.0, 0.0));
        assert_eq!(t, 1.0);

        let (p, _) = closest_point_on_segment(Vec2::ONE, Vec2::ONE, Vec2::new(5.0, 5.0));
        assert_eq!(p, Vec2::ONE);
    }

    #[test]
    fn test_intersect_line_segments() {
        let (p, t, u) = intersect_line_segments(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
        )
        .unwrap();
        assert!((p.x - 1.0).abs() < EPSILON);
        assert!((p.y - 1.0).abs() < EPSILON);
        assert!((t - 0.5).abs() < EPSILON);
        assert!((u - 0.5).abs() < EPSILON);

        // intersection would be at t = 1.5
        assert!(intersect_line_segments(Vec2::ZERO, Vec2::ONE, Vec2::new(1.0, 2.0), Vec2::new(3.0, 0.0)).is_none());
        // parallel
        assert!(intersect_line_segments(Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::ONE).is_none());
    }

    #[test]
    fn test_circle_to_circle_exactly_touching() {
        let a = circle(5.0, 0.0, 0.0);
        let b = circle(5.0, 10.0, 0.0);
        assert!(!circles_overlap(&a, &b));
        assert!(circle_to_circle(&a, &b).is_none());
    }

    #[test]
    fn test_circle_to_circle_colliding() {
        let a = circle(1.0, 0.0, 0.0);
        let b = circle(1.0, 1.5, 0.0);
        let result = circle_to_circle(&a, &b).unwrap();

        // normal points from b to a
        assert_relative_eq!(result.normal.x, -1.0);
        assert_relative_eq!(result.normal.y, 0.0);
        assert_relative_eq!(result.minimum_translation_vector.x, 0.5);
        assert_relative_eq!(result.point.x, 0.5);

        // subtracting the mtv leaves the circles just touching
        let moved = circle(1.0, -result.minimum_translation_vector.x, 0.0);
        assert!(!circles_overlap(&moved, &b));
    }

    #[test]
    fn test_circle_to_circle_concentric() {
        let a = circle(2.0, 3.0, 3.0);
        let b = circle(1.0, 3.0, 3.0);
        let result = circle_to_circle(&a, &b).unwrap();
        assert_eq!(result.normal, Vec2::UP);
        assert_relative_eq!(result.minimum_translation_vector.y, -3.0);
        assert!(!result.normal.x.is_nan());

        let reverse = circle_to_circle(&b, &a).unwrap().inverted();
        assert_eq!(reverse.normal, result.normal);
        assert_eq!(reverse.minimum_translation_vector, result.minimum_translation_vector);

        // equal radii have no distinguishing side; both orders report +y
        let twin = circle(2.0, 3.0, 3.0);
        assert_eq!(circle_to_circle(&a, &twin).unwrap().normal, Vec2::UP);
        assert_eq!(circle_to_circle(&twin, &a).unwrap().normal, Vec2::UP);
    }

    #[test]
    fn test_circle_to_box_outside() {
        let c = circle(2.0, 11.0, 5.0);
        let b = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(circle_overlaps_box(&c, &b));

        let result = circle_to_box(&c, &b).unwrap();
        assert_eq!(result.point, Vec2::new(10.0, 5.0));
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(result.minimum_translation_vector.x, -1.0);

        let touching = circle(2.0, 12.0, 5.0);
        assert!(circle_to_box(&touching, &b).is_some(), "touching counts");
        assert!(circle_to_box(&circle(2.0, 12.5, 5.0), &b).is_none());
        assert!(!circle_overlaps_box(&circle(2.0, 12.5, 5.0), &b));
    }

    #[test]
    fn test_circle_to_box_center_inside() {
        let c = circle(2.0, 9.0, 5.0);
        let b = boxed(0.0, 0.0, 10.0, 10.0);
        let result = circle_to_box(&c, &b).unwrap();
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));
        assert_eq!(result.point, Vec2::new(10.0, 5.0));
        // pushed out to x = 12
        assert_relative_eq!(result.minimum_translation_vector.x, -3.0);
    }

    #[test]
    fn test_circle_to_box_center_on_border() {
        let c = circle(2.0, 10.0, 5.0);
        let b = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(circle_overlaps_box(&c, &b));
        let result = circle_to_box(&c, &b).unwrap();
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));
        assert_eq!(result.minimum_translation_vector, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_circle_to_polygon_outside() {
        let c = circle(1.0, 3.5, 1.0);
        let p = square_polygon(0.0, 0.0, 3.0);
        assert!(circle_overlaps_polygon(&c, &p));

        let result = circle_to_polygon(&c, &p).unwrap();
        assert_relative_eq!(result.normal.x, 1.0);
        assert_relative_eq!(result.point.x, 3.0);
        assert_relative_eq!(result.minimum_translation_vector.x, -0.5);

        assert!(circle_to_polygon(&circle(1.0, 4.5, 1.0), &p).is_none());
    }

    #[test]
    fn test_circle_to_polygon_enclosed() {
        let c = circle(1.0, 50.0, 50.0);
        let p = square_polygon(0.0, 0.0, 100.0);
        assert!(circle_overlaps_polygon(&c, &p));
        let result = circle_to_polygon(&c, &p).unwrap();
        // nearest edge is 50 away, circle has to travel 51 to clear it
        assert_relative_eq!(result.minimum_translation_vector.magnitude(), 51.0, epsilon = EPSILON);
    }

    #[test]
    fn test_circle_to_polygon_center_on_edge() {
        let c = circle(1.0, 3.0, 1.0);
        let p = square_polygon(0.0, 0.0, 3.0);
        let result = circle_to_polygon(&c, &p).unwrap();
        assert_relative_eq!(result.minimum_translation_vector.magnitude(), 1.0);
    }

    #[test]
    fn test_box_to_box_scenario() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(5.0, 5.0, 10.0, 10.0);
        let result = box_to_box(&a, &b).unwrap();

        assert_relative_eq!(result.minimum_translation_vector.magnitude(), 5.0);
        assert!(result.minimum_translation_vector.x == 0.0 || result.minimum_translation_vector.y == 0.0);
        assert_relative_eq!(result.normal.magnitude(), 1.0);
        assert_eq!(result.point, Vec2::new(7.5, 7.5));
    }

    #[test]
    fn test_box_to_box_touching_edges() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(10.0, 0.0, 10.0, 10.0);
        assert!(box_to_box(&a, &b).is_none());
    }

    #[test]
    fn test_minkowski_agrees_with_aabb_random() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..2000 {
            let a = boxed(
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
                rng.random_range(0.1..30.0),
                rng.random_range(0.1..30.0),
            );
            let b = boxed(
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
                rng.random_range(0.1..30.0),
                rng.random_range(0.1..30.0),
            );
            assert_eq!(
                box_to_box(&a, &b).is_some(),
                a.bounding_box().intersects(&b.bounding_box()),
                "{:?} vs {:?}",
                a.bounding_box(),
                b.bounding_box()
            );
        }
    }

    #[test]
    fn test_polygon_to_polygon() {
        let a = square_polygon(0.0, 0.0, 4.0);
        let b = square_polygon(3.0, 1.0, 4.0);
        assert!(polygons_overlap(&a, &b));

        let result = polygon_to_polygon(&a, &b).unwrap();
        assert_relative_eq!(result.normal.x, -1.0);
        assert_relative_eq!(result.minimum_translation_vector.x, 1.0);
        assert_relative_eq!(result.point.x, 4.0);

        let touching = square_polygon(4.0, 0.0, 4.0);
        assert!(!polygons_overlap(&a, &touching));
        assert!(polygon_to_polygon(&a, &square_polygon(10.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_polygon_to_polygon_rotated() {
        let a = square_polygon(0.0, 0.0, 2.0);
        let mut diamond = Polygon::with_center(
            vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(0.0, 2.0)],
            Vec2::new(1.0, 1.0),
        )
        .unwrap();
        diamond.set_rotation(std::f64::consts::FRAC_PI_4);

        // diamond's left tip reaches x = 3 - sqrt(2)
        diamond.set_position(Vec2::new(3.0, 1.0));
        assert!(polygons_overlap(&a, &diamond));
        let result = polygon_to_polygon(&a, &diamond).unwrap();
        assert_relative_eq!(result.minimum_translation_vector.magnitude(), 2.0 - (3.0 - 2.0_f64.sqrt()), epsilon = 1e-9);

        diamond.set_position(Vec2::new(3.5, 1.0));
        assert!(!polygons_overlap(&a, &diamond));
    }

    #[test]
    fn test_polygon_to_polygon_equal_depths_ignore_argument_order() {
        let a = square_polygon(0.0, 0.0, 10.0);
        // same square, point loop starting at another corner
        let mut b = Polygon::new(vec![
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ])
        .unwrap();
        b.set_position(Vec2::new(5.0, 5.0));

        let forward = polygon_to_polygon(&a, &b).unwrap();
        let reverse = polygon_to_polygon(&b, &a).unwrap().inverted();
        assert_eq!(forward.normal, reverse.normal);
        assert_eq!(forward.minimum_translation_vector, reverse.minimum_translation_vector);
        assert_eq!(forward.normal, Vec2::new(0.0, -1.0));
        assert_eq!(forward.minimum_translation_vector, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_polygon_to_polygon_same_center_on_axis() {
        // centred on each other along x; only the interval widths differ
        let wide = square_polygon(0.0, 0.0, 10.0);
        let mut narrow = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 20.0),
            Vec2::new(0.0, 20.0),
        ])
        .unwrap();
        narrow.set_position(Vec2::new(3.0, -5.0));

        let forward = polygon_to_polygon(&wide, &narrow).unwrap();
        let reverse = polygon_to_polygon(&narrow, &wide).unwrap().inverted();
        assert_eq!(forward.normal, reverse.normal);
        assert_eq!(forward.minimum_translation_vector, reverse.minimum_translation_vector);
        assert_relative_eq!(forward.minimum_translation_vector.magnitude(), 7.0);
    }
}
