use std::collections::HashSet;

use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::{
    collision::{CollisionResult, SpatialHash},
    config::CollisionConfig,
    error::{CollisionError, Result},
    math::{Rect, Vec2},
    objects::{Entity, EntityKey},
    shapes::Shape,
};

/// The owning collection of entities and the spatial hash that indexes them.
///
/// Every mutation that can move an entity's bounds goes through the world so
/// the hash never holds stale cell memberships. Entities with a
/// [`NullCollider`](crate::shapes::NullCollider) are stored but never indexed.
#[derive(Debug)]
pub struct CollisionWorld {
    entities: SlotMap<EntityKey, Entity>,
    hash: SpatialHash<EntityKey>,
    config: CollisionConfig,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self {
            entities: SlotMap::with_key(),
            hash: SpatialHash::default(),
            config: CollisionConfig::default(),
        }
    }
}

/// Bounds under which an entity is indexed, if it is indexed at all.
fn indexed_bounds(entity: &Entity) -> Option<Rect> {
    entity.is_indexed().then(|| entity.bounds())
}

fn reindex(hash: &mut SpatialHash<EntityKey>, key: EntityKey, before: Option<Rect>, after: Option<Rect>) {
    match (before, after) {
        (Some(old), Some(new)) => hash.update_position(key, &old, &new),
        (Some(old), None) => {
            hash.remove(key, &old);
        }
        (None, Some(new)) => hash.add(key, &new),
        (None, None) => {}
    }
}

/// Keys of every indexed entity other than `exclude` whose collider overlaps
/// `shape`, in key order.
fn overlapping(
    hash: &mut SpatialHash<EntityKey>,
    entities: &SlotMap<EntityKey, Entity>,
    shape: &Shape,
    exclude: Option<EntityKey>,
) -> Vec<EntityKey> {
    let mut found: Vec<EntityKey> = hash
        .broadphase(&shape.bounding_box(), exclude)
        .into_iter()
        .filter(|key| entities.get(*key).is_some_and(|other| shape.overlaps(other.collider())))
        .collect();
    found.sort();
    found
}

impl CollisionWorld {
    pub fn new(config: CollisionConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "Creating CollisionWorld: cell_size={}, point_tolerance={}",
            config.cell_size, config.point_tolerance
        );
        Ok(Self {
            entities: SlotMap::with_key(),
            hash: SpatialHash::new(config.cell_size)?,
            config,
        })
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    pub fn spatial_hash(&self) -> &SpatialHash<EntityKey> {
        &self.hash
    }

    fn entity(&self, key: EntityKey) -> Result<&Entity> {
        self.entities.get(key).ok_or(CollisionError::UnknownEntity(key))
    }

    // --- Membership ---

    pub fn add_instance(&mut self, entity: Entity) -> EntityKey {
        let bounds = indexed_bounds(&entity);
        let key = self.entities.insert(entity);
        trace!("Added instance {:?}", key);
        reindex(&mut self.hash, key, None, bounds);
        key
    }

    pub fn remove_instance(&mut self, key: EntityKey) -> Result<Entity> {
        let entity = self.entities.remove(key).ok_or(CollisionError::UnknownEntity(key))?;
        if let Some(bounds) = indexed_bounds(&entity) {
            if !self.hash.remove(key, &bounds) {
                warn!("{:?} was not listed under its bounds {:?}; scanning every cell", key, bounds);
                self.hash.remove_with_brute_force(key);
            }
        }
        trace!("Removed instance {:?}", key);
        Ok(entity)
    }

    /// Removes every entity and drops all cells.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.hash.clear();
    }

    // --- Mutation ---

    pub fn set_position(&mut self, key: EntityKey, position: Vec2) -> Result<()> {
        self.modify_collider(key, |collider| collider.set_position(position))
    }

    /// Swaps in a new collider at the entity's current position and returns the old one.
    pub fn set_collider(&mut self, key: EntityKey, collider: impl Into<Shape>) -> Result<Shape> {
        let mut collider = collider.into();
        self.modify_collider(key, move |current| {
            collider.set_position(current.position());
            std::mem::replace(current, collider)
        })
    }

    /// Runs `f` on the entity's collider, then re-indexes the entity under its new bounds.
    pub fn modify_collider<R>(&mut self, key: EntityKey, f: impl FnOnce(&mut Shape) -> R) -> Result<R> {
        let entity = self.entities.get_mut(key).ok_or(CollisionError::UnknownEntity(key))?;
        let before = indexed_bounds(entity);
        let output = f(entity.collider_mut());
        let after = indexed_bounds(entity);
        reindex(&mut self.hash, key, before, after);
        Ok(output)
    }

    pub fn set_depth(&mut self, key: EntityKey, depth: i32) -> Result<()> {
        let entity = self.entities.get_mut(key).ok_or(CollisionError::UnknownEntity(key))?;
        if entity.depth() == depth {
            return Ok(());
        }
        entity.set_depth(depth);
        if let Some(bounds) = indexed_bounds(entity) {
            self.hash.remove(key, &bounds);
            self.hash.add(key, &bounds);
        }
        Ok(())
    }

    /// Every entity key, shallowest depth first. Ties keep key order.
    pub fn instances_by_depth(&self) -> Vec<EntityKey> {
        let mut keys: Vec<(i32, EntityKey)> = self.entities.iter().map(|(key, e)| (e.depth(), key)).collect();
        keys.sort();
        keys.into_iter().map(|(_, key)| key).collect()
    }

    // --- Entity Queries ---

    /// Whether the entity overlaps any other entity.
    pub fn collides(&mut self, key: EntityKey) -> Result<bool> {
        self.entity(key)?;
        Ok(self.hash.any_entity(key, &self.entities))
    }

    /// Whether the entity overlaps another entity accepted by `filter`.
    pub fn collides_with(&mut self, key: EntityKey, mut filter: impl FnMut(&Entity) -> bool) -> Result<bool> {
        let shape = self.entities.get(key).ok_or(CollisionError::UnknownEntity(key))?.collider();
        Ok(overlapping(&mut self.hash, &self.entities, shape, Some(key))
            .into_iter()
            .any(|other| self.entities.get(other).is_some_and(&mut filter)))
    }

    pub fn collides_with_type(&mut self, key: EntityKey, object_type: &str) -> Result<bool> {
        self.collides_with(key, |other| other.is_type(object_type))
    }

    /// Whether the entity would overlap something accepted by `filter` if it
    /// stood at `position`. The entity itself is not moved.
    pub fn collides_with_place(
        &mut self,
        key: EntityKey,
        position: Vec2,
        mut filter: impl FnMut(&Entity) -> bool,
    ) -> Result<bool> {
        let mut probe = self.entity(key)?.collider().clone();
        probe.set_position(position);
        Ok(overlapping(&mut self.hash, &self.entities, &probe, Some(key))
            .into_iter()
            .any(|other| self.entities.get(other).is_some_and(&mut filter)))
    }

    /// Contact data for `point` against the entity's collider, using the
    /// configured point tolerance for circles.
    pub fn collides_with_point(&self, key: EntityKey, point: Vec2) -> Result<Option<CollisionResult>> {
        let collider = self.entity(key)?.collider();
        Ok(collider.collides_with_point_tolerance(point, self.config.point_tolerance))
    }

    /// Other entities whose bounds share a cell with this entity's bounds.
    pub fn broadphase_entity(&mut self, key: EntityKey) -> Result<HashSet<EntityKey>> {
        self.entity(key)?;
        Ok(self.hash.broadphase_entity(key, &self.entities))
    }

    // --- Point Queries ---

    /// Entities accepted by `filter` whose collider contains `point`, in key order.
    pub fn point_collisions(&mut self, point: Vec2, mut filter: impl FnMut(&Entity) -> bool) -> Vec<EntityKey> {
        let probe = Rect::from_position_size(point, Vec2::ZERO);
        let mut found: Vec<EntityKey> = self
            .hash
            .broadphase(&probe, None)
            .into_iter()
            .filter(|key| {
                self.entities
                    .get(*key)
                    .is_some_and(|e| filter(e) && e.collider().contains_point(point))
            })
            .collect();
        found.sort();
        found
    }

    pub fn point_collision(&mut self, point: Vec2, filter: impl FnMut(&Entity) -> bool) -> Option<EntityKey> {
        self.point_collisions(point, filter).into_iter().next()
    }

    pub fn point_collides(&mut self, point: Vec2, filter: impl FnMut(&Entity) -> bool) -> bool {
        self.point_collision(point, filter).is_some()
    }

    // --- Region Queries ---

    pub fn any_in(&mut self, bounds: &Rect) -> bool {
        self.hash.any(bounds, None, &self.entities)
    }

    pub fn first_in(&mut self, bounds: &Rect) -> Option<EntityKey> {
        self.hash.first_or_default(bounds, None, &self.entities)
    }

    pub fn broadphase(&mut self, bounds: &Rect) -> HashSet<EntityKey> {
        self.hash.broadphase(bounds, None)
    }

    // --- Type Lookup ---

    /// The lowest-keyed entity tagged `object_type`.
    pub fn find(&self, object_type: &str) -> Option<EntityKey> {
        self.find_all(object_type).into_iter().next()
    }

    pub fn find_all(&self, object_type: &str) -> Vec<EntityKey> {
        let mut keys: Vec<EntityKey> = self
            .entities
            .iter()
            .filter(|(_, e)| e.is_type(object_type))
            .map(|(key, _)| key)
            .collect();
        keys.sort();
        keys
    }
}
