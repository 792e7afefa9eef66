use crate::error::{check_dimension, Result};
use crate::math::{Rect, Vec2};
use crate::shapes::polygon::Polygon;

/// A rectangle stored as a four-point polygon.
///
/// The corners run `(0,0) (w,0) (w,h) (0,h)`, so with the default centre the
/// position is the top-left corner. While the rotation is zero, collision code
/// treats the box as its bounding rectangle.
#[derive(Debug, Clone)]
pub struct BoxShape {
    width: f64,
    height: f64,
    polygon: Polygon,
}

impl BoxShape {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let width = check_dimension("width", width)?;
        let height = check_dimension("height", height)?;
        Ok(Self {
            width,
            height,
            polygon: Polygon::from_points_unchecked(corners(width, height)),
        })
    }

    /// An unrotated box covering `bounds`. Negative sizes are clamped to zero.
    pub fn covering(bounds: &Rect) -> Self {
        let width = bounds.width.max(0.0);
        let height = bounds.height.max(0.0);
        let mut polygon = Polygon::from_points_unchecked(corners(width, height));
        polygon.set_position(bounds.position());
        Self { width, height, polygon }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn set_width(&mut self, width: f64) -> Result<()> {
        let height = self.height;
        self.set_size(width, height)
    }

    pub fn set_height(&mut self, height: f64) -> Result<()> {
        let width = self.width;
        self.set_size(width, height)
    }

    pub fn set_size(&mut self, width: f64, height: f64) -> Result<()> {
        let width = check_dimension("width", width)?;
        let height = check_dimension("height", height)?;
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.polygon.replace_original_points(corners(width, height));
        }
        Ok(())
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn position(&self) -> Vec2 {
        self.polygon.position()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.polygon.set_position(position);
    }

    pub fn rotation(&self) -> f64 {
        self.polygon.rotation()
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.polygon.set_rotation(rotation);
    }

    pub fn center(&self) -> Vec2 {
        self.polygon.center()
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.polygon.set_center(center);
    }

    pub fn is_unrotated(&self) -> bool {
        self.polygon.is_unrotated()
    }

    pub fn bounding_box(&self) -> Rect {
        self.polygon.bounding_box()
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.is_unrotated() {
            self.bounding_box().contains(point)
        } else {
            self.polygon.contains_point(point)
        }
    }
}

fn corners(width: f64, height: f64) -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(width, 0.0),
        Vec2::new(width, height),
        Vec2::new(0.0, height),
    ]
}
