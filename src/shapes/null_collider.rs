use crate::math::{Rect, Vec2};

/// A collider with a position and nothing to hit.
///
/// Entities start with one so they can always be queried; it never overlaps
/// anything and is never stored in the spatial hash.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NullCollider {
    pub position: Vec2,
}

impl NullCollider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::EMPTY
    }
}
