use std::cell::Cell;

use crate::error::{check_dimension, Result};
use crate::math::{Rect, Vec2};

/// A circle positioned by its centre.
///
/// The bounding box is cached and only rebuilt on the first read after the
/// radius or position changes.
#[derive(Debug, Clone)]
pub struct Circle {
    radius: f64,
    position: Vec2,
    dirty: Cell<bool>,
    bounds: Cell<Rect>,
}

impl Circle {
    /// Creates a circle centred on the origin. Negative or NaN radii are rejected.
    pub fn new(radius: f64) -> Result<Self> {
        let radius = check_dimension("radius", radius)?;
        Ok(Self {
            radius,
            position: Vec2::ZERO,
            dirty: Cell::new(true),
            bounds: Cell::new(Rect::EMPTY),
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        let radius = check_dimension("radius", radius)?;
        if radius != self.radius {
            self.radius = radius;
            self.dirty.set(true);
        }
        Ok(())
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        if position != self.position {
            self.position = position;
            self.dirty.set(true);
        }
    }

    pub fn bounding_box(&self) -> Rect {
        self.ensure_fresh();
        self.bounds.get()
    }

    /// Inclusive test: points on the circumference are inside.
    pub fn contains_point(&self, point: Vec2) -> bool {
        (point - self.position).magnitude_squared() <= self.radius * self.radius
    }

    fn ensure_fresh(&self) {
        if self.dirty.get() {
            let r = self.radius;
            self.bounds.set(Rect::new(self.position.x - r, self.position.y - r, r * 2.0, r * 2.0));
            self.dirty.set(false);
        }
    }
}
