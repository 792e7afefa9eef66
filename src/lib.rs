pub mod collision;
pub mod config;
pub mod error;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{CollisionResult, RaycastHit, SpatialHash};
pub use config::CollisionConfig;
pub use error::{CollisionError, Result};
pub use math::{Rect, Vec2};
pub use objects::{Entity, EntityKey};
pub use shapes::{BoxShape, Circle, NullCollider, Polygon, Shape, ShapeArg, ShapeKind};
pub use world::CollisionWorld;
