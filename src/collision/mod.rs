pub mod detection;
pub mod line;
pub mod point;
pub mod result;
pub mod spatial_hash;

// Re-export key types
pub use result::{CollisionResult, RaycastHit};
pub use spatial_hash::{ColliderSource, SpatialHash, DEFAULT_CELL_SIZE};
