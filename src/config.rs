//! Tunables for a [`CollisionWorld`](crate::world::CollisionWorld), loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collision::DEFAULT_CELL_SIZE;
use crate::error::{CollisionError, Result};
use crate::shapes::DEFAULT_POINT_TOLERANCE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of a spatial hash cell, in world units.
    pub cell_size: i32,
    /// Padding added to circle radii by point queries.
    pub point_tolerance: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            point_tolerance: DEFAULT_POINT_TOLERANCE,
        }
    }
}

impl CollisionConfig {
    /// Parses a TOML document. Missing keys fall back to their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| CollisionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CollisionError::Config(e.to_string()))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = self.to_toml_string()?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size <= 0 {
            return Err(CollisionError::InvalidCellSize(self.cell_size));
        }
        if !self.point_tolerance.is_finite() || self.point_tolerance < 0.0 {
            return Err(CollisionError::Config(format!(
                "point_tolerance must be finite and non-negative, got {}",
                self.point_tolerance
            )));
        }
        Ok(())
    }
}
