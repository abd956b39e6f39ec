//! Gameplay settings
//!
//! One configuration surface for the host: grid generation, trail colliders
//! and steering. Loaded from JSON and validated before anything is built from
//! it, so inconsistent geometry never reaches the simulation.

use std::fs;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{LineRunnerError, Result};

/// Procedural level generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// World units per grid cell
    pub unit_length: f32,
    /// Cells scanned around the tracked cell (x = columns, y = rows)
    pub generation_radius: IVec2,
    /// Minimum candidate size per axis before the catalog is queried
    pub min_placement: IVec2,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            unit_length: UNIT_LENGTH,
            generation_radius: IVec2::new(GENERATION_RADIUS.0, GENERATION_RADIUS.1),
            min_placement: IVec2::new(MIN_PLACEMENT.0, MIN_PLACEMENT.1),
        }
    }
}

/// Trail sampling and collider options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSettings {
    /// Circle around the root where segments and respawn points are suppressed
    pub exclusion_radius: f32,
    /// Edge length of the square region around the root that gets colliders
    pub outer_region_size: f32,
    /// Thickness of each trail collider
    pub collider_width: f32,
    /// Minimum spacing between recorded samples
    pub line_interval: f32,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            exclusion_radius: EXCLUSION_RADIUS,
            outer_region_size: OUTER_REGION_SIZE,
            collider_width: COLLIDER_WIDTH,
            line_interval: LINE_INTERVAL,
        }
    }
}

/// Heading controller options (consumed by the host's movement integrator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringSettings {
    /// Root travel speed (world units/s)
    pub speed: f32,
    /// Maximum turn rate (degrees/s)
    pub angular_speed: f32,
}

impl Default for SteeringSettings {
    fn default() -> Self {
        Self {
            speed: ROOT_SPEED,
            angular_speed: ROOT_ANGULAR_SPEED,
        }
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,
    pub level: LevelSettings,
    pub line: LineSettings,
    pub steering: SteeringSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            level: LevelSettings::default(),
            line: LineSettings::default(),
            steering: SteeringSettings::default(),
        }
    }
}

impl Settings {
    /// Check every cross-field invariant. Called by all loaders.
    pub fn validate(&self) -> Result<()> {
        let level = &self.level;
        if !(level.unit_length > 0.0) || !level.unit_length.is_finite() {
            return Err(LineRunnerError::InvalidConfiguration(format!(
                "unit_length must be positive, got {}",
                level.unit_length
            )));
        }
        if level.generation_radius.min_element() < 0 {
            return Err(LineRunnerError::InvalidConfiguration(format!(
                "generation_radius must not be negative, got {}",
                level.generation_radius
            )));
        }
        if level.min_placement.min_element() < 1 {
            return Err(LineRunnerError::InvalidConfiguration(format!(
                "min_placement must be at least 1 cell per axis, got {}",
                level.min_placement
            )));
        }

        let line = &self.line;
        if !(line.exclusion_radius >= 0.0) {
            return Err(LineRunnerError::InvalidConfiguration(format!(
                "exclusion_radius must not be negative, got {}",
                line.exclusion_radius
            )));
        }
        if !(line.outer_region_size > line.exclusion_radius) {
            return Err(LineRunnerError::OuterRegionTooSmall {
                outer: line.outer_region_size,
                exclusion: line.exclusion_radius,
            });
        }
        if !(line.collider_width >= 0.0) {
            return Err(LineRunnerError::InvalidConfiguration(format!(
                "collider_width must not be negative, got {}",
                line.collider_width
            )));
        }
        if !(line.line_interval > 0.0) {
            return Err(LineRunnerError::InvalidConfiguration(format!(
                "line_interval must be positive, got {}",
                line.line_interval
            )));
        }

        let steering = &self.steering;
        if !(steering.speed >= 0.0) || !(steering.angular_speed >= 0.0) {
            return Err(LineRunnerError::InvalidConfiguration(format!(
                "steering speeds must not be negative, got speed={} angular_speed={}",
                steering.speed, steering.angular_speed
            )));
        }

        Ok(())
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LineRunnerError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| LineRunnerError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
