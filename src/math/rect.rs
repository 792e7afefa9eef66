// Axis-aligned float rectangle used for bounding boxes and broadphase queries.

use crate::math::scalar;
use crate::math::vec2::Vec2;

/// An axis-aligned rectangle stored as its top-left corner and size.
///
/// "Top" is the smaller y value; the type does not care which way y points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const EMPTY: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Rect::new(position.x, position.y, size.x, size.y)
    }

    /// Creates a rectangle spanning two corners. The corners are not reordered.
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Smallest rectangle containing every point. Returns `None` for an empty slice.
    pub fn encompassing_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min_pt = *first;
        let mut max_pt = *first;
        for point in rest {
            min_pt = min_pt.min(*point);
            max_pt = max_pt.max(*point);
        }
        Some(Rect::from_min_max(min_pt, max_pt))
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }

    /// Strict containment: points on the border are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        self.left() < point.x && point.x < self.right() && self.top() < point.y && point.y < self.bottom()
    }

    /// True when `other` lies entirely within this rectangle (borders may touch).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.left() <= other.left()
            && other.right() <= self.right()
            && self.top() <= other.top()
            && other.bottom() <= self.bottom()
    }

    /// Strict overlap test; rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// Overlapping region of two rectangles, if they intersect.
    pub fn intersect_area(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let top = self.top().max(other.top());
        let left = self.left().max(other.left());
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let width = self.right().max(other.right()) - x;
        let height = self.bottom().max(other.bottom()) - y;
        Rect::new(x, y, width, height)
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn inflate(&mut self, x_amount: f64, y_amount: f64) {
        self.x -= x_amount;
        self.y -= y_amount;
        self.width += x_amount * 2.0;
        self.height += y_amount * 2.0;
    }

    pub fn offset(&mut self, amount: Vec2) {
        self.x += amount.x;
        self.y += amount.y;
    }

    /// Signed overlap depth along each axis, or zero when the rectangles are apart.
    /// The sign tells which way `self` has to move to stop overlapping `other`.
    pub fn intersection_depth(&self, other: &Rect) -> Vec2 {
        let half_a = self.size() * 0.5;
        let half_b = other.size() * 0.5;
        let distance = self.center() - other.center();
        let min_distance = half_a + half_b;

        if distance.x.abs() >= min_distance.x || distance.y.abs() >= min_distance.y {
            return Vec2::ZERO;
        }

        let depth_x = if distance.x > 0.0 { min_distance.x - distance.x } else { -min_distance.x - distance.x };
        let depth_y = if distance.y > 0.0 { min_distance.y - distance.y } else { -min_distance.y - distance.y };
        Vec2::new(depth_x, depth_y)
    }

    /// Point on the rectangle's border nearest the origin, picking one axis only.
    ///
    /// Used as the penetration vector of a Minkowski difference.
    pub fn closest_point_on_bounds_to_origin(&self) -> Vec2 {
        let max = self.max();
        let mut min_dist = self.x.abs();
        let mut bounds_point = Vec2::new(self.x, 0.0);

        if max.x.abs() < min_dist {
            min_dist = max.x.abs();
            bounds_point = Vec2::new(max.x, 0.0);
        }

        if max.y.abs() < min_dist {
            min_dist = max.y.abs();
            bounds_point = Vec2::new(0.0, max.y);
        }

        if self.y.abs() < min_dist {
            bounds_point = Vec2::new(0.0, self.y);
        }

        bounds_point
    }

    /// Nearest point inside or on the rectangle.
    pub fn closest_point_on_rect_to_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            scalar::clamp(point.x, self.left(), self.right()),
            scalar::clamp(point.y, self.top(), self.bottom()),
        )
    }

    /// Nearest point on the rectangle's border.
    pub fn closest_point_on_border_to_point(&self, point: Vec2) -> Vec2 {
        self.closest_point_on_border_with_normal(point).0
    }

    /// Nearest point on the border together with the outward normal of the edge
    /// it lies on. Outside corners report a diagonal (non-unit) normal such as `(1, 1)`.
    pub fn closest_point_on_border_with_normal(&self, point: Vec2) -> (Vec2, Vec2) {
        let mut edge_normal = Vec2::ZERO;
        let mut result = self.closest_point_on_rect_to_point(point);

        if self.contains(result) {
            let dl = result.x - self.left();
            let dr = self.right() - result.x;
            let dt = result.y - self.top();
            let db = self.bottom() - result.y;

            let min = scalar::min_of(&[dl, dr, dt, db]);
            if min == dt {
                result.y = self.top();
                edge_normal.y = -1.0;
            } else if min == db {
                result.y = self.bottom();
                edge_normal.y = 1.0;
            } else if min == dl {
                result.x = self.left();
                edge_normal.x = -1.0;
            } else {
                result.x = self.right();
                edge_normal.x = 1.0;
            }
        } else {
            if result.x == self.left() {
                edge_normal.x = -1.0;
            }
            if result.x == self.right() {
                edge_normal.x = 1.0;
            }
            if result.y == self.top() {
                edge_normal.y = -1.0;
            }
            if result.y == self.bottom() {
                edge_normal.y = 1.0;
            }
        }

        (result, edge_normal)
    }
}
