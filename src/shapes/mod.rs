pub mod box_shape;
pub mod circle;
pub mod null_collider;
pub mod polygon;

pub use box_shape::BoxShape;
pub use circle::Circle;
pub use null_collider::NullCollider;
pub use polygon::{ClosestPoint, Polygon};

use crate::collision::{detection, line, point, CollisionResult, RaycastHit};
use crate::error::{CollisionError, Result};
use crate::math::{Rect, Vec2};

/// Padding added to circle radii by point queries unless a tolerance is given.
pub const DEFAULT_POINT_TOLERANCE: f64 = 1.0;

/// The collider attached to an entity.
///
/// Pair tests match on both variants at once, so adding a variant fails to
/// compile until every pairing is handled.
#[derive(Debug, Clone)]
pub enum Shape {
    Box(BoxShape),
    Circle(Circle),
    Polygon(Polygon),
    NullCollider(NullCollider),
}

/// Variant tag, used when building shapes from argument lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Circle,
    Polygon,
    NullCollider,
}

/// One positional construction argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeArg {
    Scalar(f64),
    Pair(f64, f64),
}

impl Default for Shape {
    fn default() -> Self {
        Shape::NullCollider(NullCollider::new())
    }
}

impl From<BoxShape> for Shape {
    fn from(shape: BoxShape) -> Self {
        Shape::Box(shape)
    }
}

impl From<Circle> for Shape {
    fn from(shape: Circle) -> Self {
        Shape::Circle(shape)
    }
}

impl From<Polygon> for Shape {
    fn from(shape: Polygon) -> Self {
        Shape::Polygon(shape)
    }
}

impl From<NullCollider> for Shape {
    fn from(shape: NullCollider) -> Self {
        Shape::NullCollider(shape)
    }
}

impl Shape {
    /// Builds a shape from positional arguments.
    ///
    /// - `Circle`: one scalar radius
    /// - `Box`: scalar width and height
    /// - `Polygon`: three or more points
    /// - `NullCollider`: nothing
    pub fn from_args(kind: ShapeKind, args: &[ShapeArg]) -> Result<Shape> {
        match kind {
            ShapeKind::Circle => {
                expect_count(kind, args, 1)?;
                Ok(Circle::new(scalar_arg(kind, args, 0)?)?.into())
            }
            ShapeKind::Box => {
                expect_count(kind, args, 2)?;
                let width = scalar_arg(kind, args, 0)?;
                let height = scalar_arg(kind, args, 1)?;
                Ok(BoxShape::new(width, height)?.into())
            }
            ShapeKind::Polygon => {
                let points = (0..args.len())
                    .map(|i| pair_arg(kind, args, i))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Polygon::new(points)?.into())
            }
            ShapeKind::NullCollider => {
                expect_count(kind, args, 0)?;
                Ok(Shape::default())
            }
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Box(_) => ShapeKind::Box,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::NullCollider(_) => ShapeKind::NullCollider,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Shape::NullCollider(_))
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Shape::Box(b) => b.position(),
            Shape::Circle(c) => c.position(),
            Shape::Polygon(p) => p.position(),
            Shape::NullCollider(n) => n.position,
        }
    }

    pub fn set_position(&mut self, position: Vec2) {
        match self {
            Shape::Box(b) => b.set_position(position),
            Shape::Circle(c) => c.set_position(position),
            Shape::Polygon(p) => p.set_position(position),
            Shape::NullCollider(n) => n.position = position,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            Shape::Box(b) => b.bounding_box(),
            Shape::Circle(c) => c.bounding_box(),
            Shape::Polygon(p) => p.bounding_box(),
            Shape::NullCollider(n) => n.bounding_box(),
        }
    }

    /// Boolean overlap test. Symmetric in its arguments.
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::NullCollider(_), _) | (_, Shape::NullCollider(_)) => false,
            (Shape::Circle(a), Shape::Circle(b)) => detection::circles_overlap(a, b),
            (Shape::Circle(c), Shape::Box(b)) | (Shape::Box(b), Shape::Circle(c)) => {
                if b.is_unrotated() {
                    detection::circle_overlaps_box(c, b)
                } else {
                    detection::circle_overlaps_polygon(c, b.polygon())
                }
            }
            (Shape::Circle(c), Shape::Polygon(p)) | (Shape::Polygon(p), Shape::Circle(c)) => {
                detection::circle_overlaps_polygon(c, p)
            }
            (Shape::Box(a), Shape::Box(b)) => {
                if a.is_unrotated() && b.is_unrotated() {
                    a.bounding_box().intersects(&b.bounding_box())
                } else {
                    detection::polygons_overlap(a.polygon(), b.polygon())
                }
            }
            (Shape::Box(a), Shape::Polygon(b)) => detection::polygons_overlap(a.polygon(), b),
            (Shape::Polygon(p), Shape::Box(b)) => detection::polygons_overlap(b.polygon(), p),
            (Shape::Polygon(a), Shape::Polygon(b)) => detection::polygons_overlap(a, b),
        }
    }

    /// Collision test with contact data. The normal points from `other`
    /// towards `self`; subtracting the MTV from `self` separates the shapes.
    pub fn collides_with_shape(&self, other: &Shape) -> Option<CollisionResult> {
        match (self, other) {
            (Shape::NullCollider(_), _) | (_, Shape::NullCollider(_)) => None,
            (Shape::Circle(a), Shape::Circle(b)) => detection::circle_to_circle(a, b),
            (Shape::Circle(c), Shape::Box(b)) => circle_against_box(c, b),
            (Shape::Box(b), Shape::Circle(c)) => circle_against_box(c, b).map(CollisionResult::inverted),
            (Shape::Circle(c), Shape::Polygon(p)) => detection::circle_to_polygon(c, p),
            (Shape::Polygon(p), Shape::Circle(c)) => {
                detection::circle_to_polygon(c, p).map(CollisionResult::inverted)
            }
            (Shape::Box(a), Shape::Box(b)) => {
                if a.is_unrotated() && b.is_unrotated() {
                    detection::box_to_box(a, b)
                } else {
                    detection::polygon_to_polygon(a.polygon(), b.polygon())
                }
            }
            (Shape::Box(a), Shape::Polygon(b)) => detection::polygon_to_polygon(a.polygon(), b),
            (Shape::Polygon(p), Shape::Box(b)) => {
                detection::polygon_to_polygon(b.polygon(), p).map(CollisionResult::inverted)
            }
            (Shape::Polygon(a), Shape::Polygon(b)) => detection::polygon_to_polygon(a, b),
        }
    }

    /// Whether the segment `start..end` touches the shape.
    pub fn collides_with_line(&self, start: Vec2, end: Vec2) -> bool {
        self.raycast(start, end).is_some()
    }

    /// First hit along the segment `start..end`.
    pub fn raycast(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        match self {
            Shape::Box(b) => line::line_to_polygon(start, end, b.polygon()),
            Shape::Circle(c) => line::line_to_circle(start, end, c),
            Shape::Polygon(p) => line::line_to_polygon(start, end, p),
            Shape::NullCollider(_) => None,
        }
    }

    /// Exact point-in-shape test, no padding.
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self {
            Shape::Box(b) => b.contains_point(point),
            Shape::Circle(c) => c.contains_point(point),
            Shape::Polygon(p) => p.contains_point(point),
            Shape::NullCollider(_) => false,
        }
    }

    /// Point collision with contact data, padding circles by [`DEFAULT_POINT_TOLERANCE`].
    pub fn collides_with_point(&self, point: Vec2) -> Option<CollisionResult> {
        self.collides_with_point_tolerance(point, DEFAULT_POINT_TOLERANCE)
    }

    pub fn collides_with_point_tolerance(&self, point: Vec2, tolerance: f64) -> Option<CollisionResult> {
        match self {
            Shape::Box(b) => {
                if b.is_unrotated() {
                    point::point_to_box(point, b)
                } else {
                    point::point_to_polygon(point, b.polygon())
                }
            }
            Shape::Circle(c) => point::point_to_circle(point, c, tolerance),
            Shape::Polygon(p) => point::point_to_polygon(point, p),
            Shape::NullCollider(_) => None,
        }
    }
}

fn circle_against_box(circle: &Circle, shape: &BoxShape) -> Option<CollisionResult> {
    if shape.is_unrotated() {
        detection::circle_to_box(circle, shape)
    } else {
        detection::circle_to_polygon(circle, shape.polygon())
    }
}

fn expect_count(kind: ShapeKind, args: &[ShapeArg], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(CollisionError::WrongArgumentCount {
            kind,
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn scalar_arg(kind: ShapeKind, args: &[ShapeArg], index: usize) -> Result<f64> {
    match args[index] {
        ShapeArg::Scalar(value) => Ok(value),
        ShapeArg::Pair(..) => Err(CollisionError::WrongArgumentType {
            kind,
            index,
            expected: "scalar",
        }),
    }
}

fn pair_arg(kind: ShapeKind, args: &[ShapeArg], index: usize) -> Result<Vec2> {
    match args[index] {
        ShapeArg::Pair(x, y) => Ok(Vec2::new(x, y)),
        ShapeArg::Scalar(_) => Err(CollisionError::WrongArgumentType {
            kind,
            index,
            expected: "point",
        }),
    }
}
