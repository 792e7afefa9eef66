use slotmap::SlotMap;

use crate::collision::ColliderSource;
use crate::math::{Rect, Vec2};
use crate::shapes::Shape;

slotmap::new_key_type! {
    /// Handle to an entity stored in a [`CollisionWorld`](crate::world::CollisionWorld).
    pub struct EntityKey;
}

/// Something placed in the world: a collider, a draw depth and a type tag.
///
/// The tag is an opaque string used by type-filtered queries; nothing here
/// interprets it.
#[derive(Debug, Clone)]
pub struct Entity {
    object_type: String,
    collider: Shape,
    depth: i32,
}

impl Entity {
    /// Creates an entity with a [`NullCollider`](crate::shapes::NullCollider) at the origin.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            collider: Shape::default(),
            depth: 0,
        }
    }

    /// Replaces the collider, keeping the entity's current position.
    pub fn with_collider(mut self, collider: impl Into<Shape>) -> Self {
        let position = self.collider.position();
        self.collider = collider.into();
        self.collider.set_position(position);
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.collider.set_position(position);
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn is_type(&self, object_type: &str) -> bool {
        self.object_type == object_type
    }

    pub fn collider(&self) -> &Shape {
        &self.collider
    }

    pub fn position(&self) -> Vec2 {
        self.collider.position()
    }

    pub fn bounds(&self) -> Rect {
        self.collider.bounding_box()
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Whether the entity belongs in the spatial hash.
    pub(crate) fn is_indexed(&self) -> bool {
        !self.collider.is_null()
    }

    pub(crate) fn collider_mut(&mut self) -> &mut Shape {
        &mut self.collider
    }

    pub(crate) fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }
}

impl ColliderSource<EntityKey> for SlotMap<EntityKey, Entity> {
    fn collider(&self, key: EntityKey) -> Option<&Shape> {
        self.get(key).map(Entity::collider)
    }
}
