// Uniform-grid broadphase keyed by packed cell coordinates.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use log::{debug, trace};

use crate::error::{CollisionError, Result};
use crate::math::{scalar, Rect};
use crate::shapes::{BoxShape, Shape};

/// Looks up the collider of an indexed item. The hash only stores keys, so
/// exact-shape queries need a way back to the shapes.
pub trait ColliderSource<K> {
    fn collider(&self, key: K) -> Option<&Shape>;
}

impl<K: Eq + Hash, S: BuildHasher> ColliderSource<K> for HashMap<K, Shape, S> {
    fn collider(&self, key: K) -> Option<&Shape> {
        self.get(&key)
    }
}

/// Packs signed cell coordinates into one map key.
#[inline]
fn cell_key(x: i32, y: i32) -> i64 {
    ((x as i64) << 32) | (y as u32 as i64)
}

/// Half-open block of cells `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl CellRange {
    fn keys(self) -> impl Iterator<Item = i64> {
        (self.min_x..self.max_x).flat_map(move |x| (self.min_y..self.max_y).map(move |y| cell_key(x, y)))
    }
}

pub const DEFAULT_CELL_SIZE: i32 = 100;

/// A spatial hash mapping grid cells to the items whose bounds overlap them.
///
/// Items are any copyable key (entity handles in practice). An item is listed
/// in every cell its bounds touch. Cells are created on first use, by inserts
/// and queries alike, and are kept when they empty out.
#[derive(Debug)]
pub struct SpatialHash<K> {
    cell_size: i32,
    inverse_cell_size: f64,
    cells: HashMap<i64, HashSet<K>>,
}

impl<K: Copy + Eq + Hash + Debug> SpatialHash<K> {
    /// Creates an empty hash.
    ///
    /// # Arguments
    /// * `cell_size` - Width and height of a cell in world units. Must be positive.
    pub fn new(cell_size: i32) -> Result<Self> {
        if cell_size <= 0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        debug!("Creating SpatialHash: cell_size={}", cell_size);
        Ok(Self::with_cell_size(cell_size))
    }

    /// Creates a hash from an already validated cell size.
    fn with_cell_size(cell_size: i32) -> Self {
        SpatialHash {
            cell_size,
            inverse_cell_size: 1.0 / cell_size as f64,
            cells: HashMap::new(),
        }
    }

    // --- Helper Methods ---

    /// Cell coordinate of a world coordinate. Far-out values pile into the
    /// outermost cells so `coordinate + 1` always fits.
    fn cell_coordinate(&self, value: f64) -> i32 {
        scalar::floor_to_int(value * self.inverse_cell_size).min(i32::MAX - 1)
    }

    fn cell_range(&self, bounds: &Rect) -> CellRange {
        CellRange {
            min_x: self.cell_coordinate(bounds.left()),
            min_y: self.cell_coordinate(bounds.top()),
            max_x: self.cell_coordinate(bounds.right()) + 1,
            max_y: self.cell_coordinate(bounds.bottom()) + 1,
        }
    }

    /// Makes sure every cell under `bounds` exists.
    fn touch(&mut self, bounds: &Rect) -> CellRange {
        let range = self.cell_range(bounds);
        for key in range.keys() {
            self.cells.entry(key).or_default();
        }
        range
    }

    fn items_in(&self, range: CellRange) -> impl Iterator<Item = K> + '_ {
        range
            .keys()
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|set| set.iter().copied())
    }

    // --- Public API Methods ---

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Number of cells allocated so far, empty ones included.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Drops every cell.
    pub fn clear(&mut self) {
        debug!("Clearing SpatialHash ({} cells)", self.cells.len());
        self.cells.clear();
    }

    /// Lists `item` in every cell overlapped by `bounds`.
    pub fn add(&mut self, item: K, bounds: &Rect) {
        trace!("SpatialHash add {:?} at {:?}", item, bounds);
        for key in self.cell_range(bounds).keys() {
            self.cells.entry(key).or_default().insert(item);
        }
    }

    /// Removes `item` from the cells overlapped by `bounds`.
    ///
    /// `bounds` must be the bounds the item was added with; memberships in
    /// other cells are left behind. Returns whether anything was removed.
    pub fn remove(&mut self, item: K, bounds: &Rect) -> bool {
        trace!("SpatialHash remove {:?} at {:?}", item, bounds);
        let mut removed = false;
        for key in self.touch(bounds).keys() {
            if let Some(set) = self.cells.get_mut(&key) {
                removed |= set.remove(&item);
            }
        }
        removed
    }

    /// Removes `item` from every cell, wherever it is listed.
    pub fn remove_with_brute_force(&mut self, item: K) -> bool {
        let mut removed = false;
        for set in self.cells.values_mut() {
            removed |= set.remove(&item);
        }
        removed
    }

    /// Evicts `item` from the cells of its old bounds ahead of a move.
    /// Follow with [`SpatialHash::add`] using the new bounds.
    pub fn prep_for_move(&mut self, item: K, old_bounds: &Rect) {
        self.remove(item, old_bounds);
    }

    /// Moves `item` from the cells of `old_bounds` to those of `new_bounds` in one step.
    pub fn update_position(&mut self, item: K, old_bounds: &Rect, new_bounds: &Rect) {
        let old_range = self.cell_range(old_bounds);
        let new_range = self.cell_range(new_bounds);
        if old_range == new_range {
            return;
        }
        trace!("SpatialHash move {:?} from {:?} to {:?}", item, old_bounds, new_bounds);
        for key in old_range.keys() {
            if let Some(set) = self.cells.get_mut(&key) {
                set.remove(&item);
            }
        }
        for key in new_range.keys() {
            self.cells.entry(key).or_default().insert(item);
        }
    }

    /// Whether `item` is listed in any cell overlapped by `bounds`.
    pub fn contains(&self, item: K, bounds: &Rect) -> bool {
        self.cell_range(bounds)
            .keys()
            .any(|key| self.cells.get(&key).is_some_and(|set| set.contains(&item)))
    }

    /// Every item in the hash.
    pub fn all_objects(&self) -> HashSet<K> {
        self.cells.values().flat_map(|set| set.iter().copied()).collect()
    }

    /// Whether anything other than `exclude` overlaps the rectangle `bounds`.
    pub fn any(&mut self, bounds: &Rect, exclude: Option<K>, colliders: &impl ColliderSource<K>) -> bool {
        let probe = Shape::Box(BoxShape::covering(bounds));
        self.any_overlapping(&probe, exclude, colliders)
    }

    /// Whether anything other than `exclude` overlaps `shape`.
    pub fn any_overlapping(&mut self, shape: &Shape, exclude: Option<K>, colliders: &impl ColliderSource<K>) -> bool {
        self.first_overlapping(shape, exclude, colliders).is_some()
    }

    /// Whether `item`'s own collider overlaps any other item.
    pub fn any_entity(&mut self, item: K, colliders: &impl ColliderSource<K>) -> bool {
        match colliders.collider(item) {
            Some(shape) => self.any_overlapping(shape, Some(item), colliders),
            None => false,
        }
    }

    /// First item other than `exclude` overlapping the rectangle `bounds`.
    pub fn first_or_default(&mut self, bounds: &Rect, exclude: Option<K>, colliders: &impl ColliderSource<K>) -> Option<K> {
        let probe = Shape::Box(BoxShape::covering(bounds));
        self.first_overlapping(&probe, exclude, colliders)
    }

    /// First item other than `exclude` whose collider overlaps `shape`.
    pub fn first_overlapping(
        &mut self,
        shape: &Shape,
        exclude: Option<K>,
        colliders: &impl ColliderSource<K>,
    ) -> Option<K> {
        let range = self.touch(&shape.bounding_box());
        self.items_in(range).find(|&item| {
            Some(item) != exclude && colliders.collider(item).is_some_and(|other| shape.overlaps(other))
        })
    }

    /// Every item sharing a cell with `bounds`, without exact-shape filtering.
    pub fn broadphase(&mut self, bounds: &Rect, exclude: Option<K>) -> HashSet<K> {
        let range = self.touch(bounds);
        let mut found: HashSet<K> = self.items_in(range).collect();
        if let Some(excluded) = exclude {
            found.remove(&excluded);
        }
        found
    }

    /// Broadphase candidates around `item`'s own collider, excluding `item`.
    pub fn broadphase_entity(&mut self, item: K, colliders: &impl ColliderSource<K>) -> HashSet<K> {
        match colliders.collider(item) {
            Some(shape) => {
                let bounds = shape.bounding_box();
                self.broadphase(&bounds, Some(item))
            }
            None => HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> Default for SpatialHash<K> {
    fn default() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::shapes::Circle;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> Shape {
        let mut b = BoxShape::new(w, h).unwrap();
        b.set_position(Vec2::new(x, y));
        b.into()
    }

    fn populated(shapes: Vec<(u32, Shape)>) -> (SpatialHash<u32>, HashMap<u32, Shape>) {
        let mut hash = SpatialHash::new(100).unwrap();
        let mut colliders = HashMap::new();
        for (id, shape) in shapes {
            hash.add(id, &shape.bounding_box());
            colliders.insert(id, shape);
        }
        (hash, colliders)
    }

    #[test]
    fn test_new_rejects_bad_cell_size() {
        assert!(matches!(SpatialHash::<u32>::new(0), Err(CollisionError::InvalidCellSize(0))));
        assert!(SpatialHash::<u32>::new(-5).is_err());
    }

    #[test]
    fn test_cell_key_packs_negative_coordinates() {
        assert_ne!(cell_key(-1, 0), cell_key(0, -1));
        assert_ne!(cell_key(1, -1), cell_key(0, u32::MAX as i32));
        assert_eq!(cell_key(0, -1), 0xFFFF_FFFF);
        assert_eq!(cell_key(-1, 0), -1_i64 << 32);
    }

    #[test]
    fn test_add_spans_cells() {
        let mut hash = SpatialHash::new(100).unwrap();
        hash.add(1u32, &Rect::new(50.0, 50.0, 100.0, 10.0));
        assert_eq!(hash.cell_count(), 2);
        assert!(hash.contains(1, &Rect::new(150.0, 55.0, 1.0, 1.0)));
        assert!(!hash.contains(1, &Rect::new(250.0, 55.0, 1.0, 1.0)));
    }

    #[test]
    fn test_right_edge_on_cell_boundary_touches_next_cell() {
        let mut hash = SpatialHash::new(100).unwrap();
        hash.add(1u32, &Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(hash.cell_count(), 4);
    }

    #[test]
    fn test_remove_and_brute_force() {
        let mut hash = SpatialHash::new(10).unwrap();
        let bounds = Rect::new(0.0, 0.0, 25.0, 5.0);
        hash.add(7u32, &bounds);
        assert!(hash.remove(7, &bounds));
        assert!(hash.all_objects().is_empty());
        assert!(!hash.remove(7, &bounds));

        hash.add(7, &bounds);
        // stale bounds miss the original cells
        assert!(!hash.remove(7, &Rect::new(500.0, 500.0, 1.0, 1.0)));
        assert!(hash.all_objects().contains(&7));
        assert!(hash.remove_with_brute_force(7));
        assert!(hash.all_objects().is_empty());
    }

    #[test]
    fn test_cells_are_not_pruned() {
        let mut hash = SpatialHash::new(10).unwrap();
        let bounds = Rect::new(0.0, 0.0, 5.0, 5.0);
        hash.add(1u32, &bounds);
        hash.remove(1, &bounds);
        assert_eq!(hash.cell_count(), 1);

        hash.broadphase(&Rect::new(100.0, 100.0, 1.0, 1.0), None);
        assert_eq!(hash.cell_count(), 2);

        hash.clear();
        assert_eq!(hash.cell_count(), 0);
    }

    #[test]
    fn test_prep_for_move_then_add() {
        let mut hash = SpatialHash::new(10).unwrap();
        let old = Rect::new(0.0, 0.0, 5.0, 5.0);
        let new = Rect::new(50.0, 50.0, 5.0, 5.0);
        hash.add(3u32, &old);
        hash.prep_for_move(3, &old);
        assert!(hash.all_objects().is_empty());
        hash.add(3, &new);
        assert!(hash.contains(3, &new));
        assert!(!hash.contains(3, &old));
    }

    #[test]
    fn test_update_position() {
        let mut hash = SpatialHash::new(10).unwrap();
        let old = Rect::new(0.0, 0.0, 15.0, 5.0);
        let new = Rect::new(-30.0, 40.0, 5.0, 15.0);
        hash.add(3u32, &old);
        hash.update_position(3, &old, &new);

        assert!(hash.contains(3, &new));
        assert!(!hash.contains(3, &old));
        assert_eq!(hash.broadphase(&old, None).len(), 0);
        assert_eq!(hash.broadphase(&new, None).len(), 1);
    }

    #[test]
    fn test_any_uses_exact_shapes() {
        let mut circle = Circle::new(10.0).unwrap();
        circle.set_position(Vec2::new(50.0, 50.0));
        let (mut hash, colliders) = populated(vec![(1, circle.into())]);

        // same cell, inside the circle's bounds but outside the circle
        let corner = Rect::new(41.0, 41.0, 1.0, 1.0);
        assert!(hash.broadphase(&corner, None).contains(&1));
        assert!(!hash.any(&corner, None, &colliders));

        let centre = Rect::new(49.0, 49.0, 2.0, 2.0);
        assert!(hash.any(&centre, None, &colliders));
        assert!(!hash.any(&centre, Some(1), &colliders));
        assert_eq!(hash.first_or_default(&centre, None, &colliders), Some(1));
        assert_eq!(hash.first_or_default(&centre, Some(1), &colliders), None);
    }

    #[test]
    fn test_any_entity_excludes_self() {
        let (mut hash, colliders) = populated(vec![
            (1, boxed(0.0, 0.0, 10.0, 10.0)),
            (2, boxed(5.0, 5.0, 10.0, 10.0)),
            (3, boxed(300.0, 300.0, 10.0, 10.0)),
        ]);
        assert!(hash.any_entity(1, &colliders));
        assert!(hash.any_entity(2, &colliders));
        assert!(!hash.any_entity(3, &colliders));
        assert!(!hash.any_entity(99, &colliders));

        let candidates = hash.broadphase_entity(1, &colliders);
        assert_eq!(candidates, HashSet::from([2]));
    }

    #[test]
    fn test_broadphase_matches_brute_force_oracle() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let cell_size = 50;
        let cells_of = |r: &Rect| -> HashSet<(i32, i32)> {
            let inv = 1.0 / cell_size as f64;
            let mut cells = HashSet::new();
            let (x0, x1) = ((r.left() * inv).floor() as i32, (r.right() * inv).floor() as i32);
            let (y0, y1) = ((r.top() * inv).floor() as i32, (r.bottom() * inv).floor() as i32);
            for x in x0..=x1 {
                for y in y0..=y1 {
                    cells.insert((x, y));
                }
            }
            cells
        };

        for _ in 0..10 {
            let mut hash = SpatialHash::new(cell_size).unwrap();
            let items: Vec<(u32, Rect)> = (0..60)
                .map(|id| {
                    let rect = Rect::new(
                        rng.random_range(-300.0..300.0),
                        rng.random_range(-300.0..300.0),
                        rng.random_range(1.0..120.0),
                        rng.random_range(1.0..120.0),
                    );
                    (id, rect)
                })
                .collect();
            for (id, rect) in &items {
                hash.add(*id, rect);
            }

            for (id, rect) in &items {
                let mine = cells_of(rect);
                let expected: HashSet<u32> = items
                    .iter()
                    .filter(|(other, other_rect)| other != id && !mine.is_disjoint(&cells_of(other_rect)))
                    .map(|(other, _)| *other)
                    .collect();
                assert_eq!(hash.broadphase(rect, Some(*id)), expected);
            }
        }
    }

    #[test]
    fn test_far_away_bounds_stay_indexable() {
        let colliders: HashMap<u32, Shape> = HashMap::new();
        let mut hash = SpatialHash::new(100).unwrap();
        let far = Rect::new(1.0e12, -1.0e12, 1.0, 1.0);
        let farther = Rect::new(3.0e12, -3.0e12, 1.0, 1.0);

        hash.add(1, &far);
        assert!(hash.contains(1, &far));
        assert!(hash.broadphase(&farther, None).contains(&1));
        assert!(!hash.any(&far, None, &colliders));
        assert_eq!(hash.first_or_default(&far, None, &colliders), None);

        hash.update_position(1, &far, &Rect::new(-1.0e12, 1.0e12, 1.0, 1.0));
        assert!(hash.contains(1, &Rect::new(-1.0e12, 1.0e12, 1.0, 1.0)));
        assert!(hash.remove(1, &Rect::new(-1.0e12, 1.0e12, 1.0, 1.0)));
        assert!(hash.all_objects().is_empty());
    }
}
