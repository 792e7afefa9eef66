//! Error type shared by shape construction, the spatial hash and the world.

use crate::objects::EntityKey;
use crate::shapes::ShapeKind;

/// Errors surfaced by the collision engine.
///
/// Every variant is a caller contract violation reported synchronously; nothing
/// inside the engine retries or recovers.
#[derive(thiserror::Error, Debug)]
pub enum CollisionError {
    /// A shape was built from the wrong number of positional arguments.
    #[error("{kind:?} expects {expected} argument(s), got {found}")]
    WrongArgumentCount {
        kind: ShapeKind,
        expected: usize,
        found: usize,
    },

    /// A positional argument had the wrong form (scalar vs point).
    #[error("{kind:?} argument {index} must be a {expected}")]
    WrongArgumentType {
        kind: ShapeKind,
        index: usize,
        expected: &'static str,
    },

    /// A size or radius was negative or not a number.
    #[error("invalid {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    /// Polygons need at least three points.
    #[error("polygon needs at least 3 points, got {found}")]
    TooFewPoints { found: usize },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(i32),

    #[error("entity {0:?} is not part of this world")]
    UnknownEntity(EntityKey),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CollisionError>;

/// Rejects negative and NaN sizes.
pub(crate) fn check_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() || value < 0.0 {
        Err(CollisionError::InvalidDimension { name, value })
    } else {
        Ok(value)
    }
}
