use std::cell::{Ref, RefCell};

use crate::collision::detection::closest_point_on_segment;
use crate::error::{CollisionError, Result};
use crate::math::{Rect, Vec2};

/// Geometry derived from the original points, rebuilt together in one pass.
#[derive(Debug, Clone)]
struct Geometry {
    dirty: bool,
    points: Vec<Vec2>,
    edge_normals: Vec<Vec2>,
    local_bounds: Rect,
}

/// Closest point on a polygon boundary to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    pub point: Vec2,
    pub distance_squared: f64,
    /// Outward normal of the edge `point` lies on.
    pub edge_normal: Vec2,
}

/// A polygon defined by a loop of points in shape-local space.
///
/// `original_points` are rotated by `rotation` radians about `center`; the
/// rotated, centre-relative loop is what `points()` returns and what every
/// collision test works with. World coordinates are `points() + position`.
///
/// Changing the rotation, centre or points only marks the derived geometry
/// stale. The next read of `points`, `edge_normals` or `bounding_box`
/// rebuilds all of it at once.
#[derive(Debug, Clone)]
pub struct Polygon {
    original_points: Vec<Vec2>,
    center: Vec2,
    rotation: f64,
    position: Vec2,
    geometry: RefCell<Geometry>,
}

impl Polygon {
    /// Creates a polygon rotating about the local origin.
    ///
    /// Returns `TooFewPoints` for fewer than three points.
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        Self::with_center(points, Vec2::ZERO)
    }

    /// Creates a polygon whose points are measured relative to `center`.
    pub fn with_center(points: Vec<Vec2>, center: Vec2) -> Result<Self> {
        check_point_count(&points)?;
        let mut polygon = Self::from_points_unchecked(points);
        polygon.center = center;
        Ok(polygon)
    }

    pub(crate) fn from_points_unchecked(points: Vec<Vec2>) -> Self {
        Polygon {
            original_points: points,
            center: Vec2::ZERO,
            rotation: 0.0,
            position: Vec2::ZERO,
            geometry: RefCell::new(Geometry {
                dirty: true,
                points: Vec::new(),
                edge_normals: Vec::new(),
                local_bounds: Rect::EMPTY,
            }),
        }
    }

    /// Smallest convex polygon enclosing `points`.
    pub fn convex_hull(points: &[Vec2]) -> Result<Self> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        sorted.dedup();

        let turns_left = |hull: &[Vec2], p: Vec2| {
            let n = hull.len();
            (hull[n - 1] - hull[n - 2]).cross(p - hull[n - 2]) > 0.0
        };

        let mut lower: Vec<Vec2> = Vec::with_capacity(sorted.len());
        for &p in &sorted {
            while lower.len() >= 2 && !turns_left(&lower, p) {
                lower.pop();
            }
            lower.push(p);
        }

        let mut upper: Vec<Vec2> = Vec::with_capacity(sorted.len());
        for &p in sorted.iter().rev() {
            while upper.len() >= 2 && !turns_left(&upper, p) {
                upper.pop();
            }
            upper.push(p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        Self::new(lower)
    }

    /// Average of the points.
    pub fn find_center(points: &[Vec2]) -> Vec2 {
        if points.is_empty() {
            return Vec2::ZERO;
        }
        let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
        sum / points.len() as f64
    }

    pub fn original_points(&self) -> &[Vec2] {
        &self.original_points
    }

    pub fn set_original_points(&mut self, points: Vec<Vec2>) -> Result<()> {
        check_point_count(&points)?;
        self.replace_original_points(points);
        Ok(())
    }

    pub(crate) fn replace_original_points(&mut self, points: Vec<Vec2>) {
        self.original_points = points;
        self.mark_dirty();
    }

    pub fn set_original_point(&mut self, index: usize, point: Vec2) -> Result<()> {
        let len = self.original_points.len();
        let slot = self
            .original_points
            .get_mut(index)
            .ok_or(CollisionError::IndexOutOfRange { index, len })?;
        if *slot != point {
            *slot = point;
            self.mark_dirty();
        }
        Ok(())
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        if center != self.center {
            self.center = center;
            self.mark_dirty();
        }
    }

    /// Rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        if rotation != self.rotation {
            self.rotation = rotation;
            self.mark_dirty();
        }
    }

    pub fn is_unrotated(&self) -> bool {
        self.rotation == 0.0
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Rotated, centre-relative points.
    pub fn points(&self) -> Ref<'_, [Vec2]> {
        Ref::map(self.geometry(), |g| g.points.as_slice())
    }

    /// One outward unit normal per edge; edge `i` runs from point `i` to `i + 1`.
    pub fn edge_normals(&self) -> Ref<'_, [Vec2]> {
        Ref::map(self.geometry(), |g| g.edge_normals.as_slice())
    }

    pub fn local_bounds(&self) -> Rect {
        self.geometry().local_bounds
    }

    pub fn bounding_box(&self) -> Rect {
        let mut bounds = self.local_bounds();
        bounds.offset(self.position);
        bounds
    }

    pub fn world_points(&self) -> Vec<Vec2> {
        self.points().iter().map(|p| *p + self.position).collect()
    }

    /// Absolute area via the shoelace formula.
    pub fn area(&self) -> f64 {
        signed_area(&self.points()).abs()
    }

    /// Ray-casting parity test in world space.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = point - self.position;
        let points = self.points();
        let mut inside = false;
        let mut j = points.len() - 1;
        for i in 0..points.len() {
            let (pi, pj) = (points[i], points[j]);
            if (pi.y > local.y) != (pj.y > local.y)
                && local.x < (pj.x - pi.x) * (local.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Closest boundary point to `local_point`, given relative to `position`.
    pub fn closest_point_to(&self, local_point: Vec2) -> ClosestPoint {
        let geometry = self.geometry();
        closest_point_on_loop(&geometry.points, &geometry.edge_normals, local_point)
    }

    /// The local point with the largest projection onto `direction`.
    pub fn farthest_point_in_direction(&self, direction: Vec2) -> Vec2 {
        let points = self.points();
        let mut best = points[0];
        let mut best_dot = best.dot(direction);
        for p in points.iter().skip(1) {
            let d = p.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = *p;
            }
        }
        best
    }

    fn mark_dirty(&mut self) {
        self.geometry.get_mut().dirty = true;
    }

    fn geometry(&self) -> Ref<'_, Geometry> {
        self.ensure_fresh();
        self.geometry.borrow()
    }

    fn ensure_fresh(&self) {
        if !self.geometry.borrow().dirty {
            return;
        }

        let points: Vec<Vec2> = self
            .original_points
            .iter()
            .map(|p| {
                let local = *p - self.center;
                if self.rotation == 0.0 {
                    local
                } else {
                    local.rotate(self.rotation)
                }
            })
            .collect();
        let edge_normals = outward_edge_normals(&points);
        let local_bounds = Rect::encompassing_points(&points).unwrap_or(Rect::EMPTY);

        *self.geometry.borrow_mut() = Geometry {
            dirty: false,
            points,
            edge_normals,
            local_bounds,
        };
    }
}

fn check_point_count(points: &[Vec2]) -> Result<()> {
    if points.len() < 3 {
        return Err(CollisionError::TooFewPoints { found: points.len() });
    }
    Ok(())
}

/// Twice the signed area; positive when the loop turns counter-clockwise in y-up space.
fn signed_area(points: &[Vec2]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        area += points[i].cross(points[(i + 1) % n]);
    }
    area / 2.0
}

fn outward_edge_normals(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    // perpendicular() points inward on a positive-area loop
    let flip = if signed_area(points) > 0.0 { -1.0 } else { 1.0 };
    (0..n)
        .map(|i| {
            let edge = points[(i + 1) % n] - points[i];
            edge.perpendicular().normalize() * flip
        })
        .collect()
}

/// Closest point on the boundary of a point loop, with the normal of the edge it was found on.
pub fn closest_point_on_loop(points: &[Vec2], edge_normals: &[Vec2], query: Vec2) -> ClosestPoint {
    let n = points.len();
    let mut best = ClosestPoint {
        point: Vec2::ZERO,
        distance_squared: f64::MAX,
        edge_normal: Vec2::ZERO,
    };

    for i in 0..n {
        let (candidate, _) = closest_point_on_segment(points[i], points[(i + 1) % n], query);
        let distance_squared = query.distance_squared(candidate);
        if distance_squared < best.distance_squared {
            best = ClosestPoint {
                point: candidate,
                distance_squared,
                edge_normal: edge_normals[i],
            };
        }
    }

    best
}
