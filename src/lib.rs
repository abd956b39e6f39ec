//! Line Runner - gameplay core for a line-drawing arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trail colliders, level generation, respawn)
//! - `settings`: Validated, data-driven configuration
//! - `error`: Crate error type

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{LineRunnerError, Result};
pub use settings::{LevelSettings, LineSettings, Settings, SteeringSettings};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one generator step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World units per grid cell
    pub const UNIT_LENGTH: f32 = 3.0;
    /// Generation radius around the tracked cell (columns, rows)
    pub const GENERATION_RADIUS: (i32, i32) = (5, 10);
    /// Smallest candidate rectangle handed to the catalog (columns, rows)
    pub const MIN_PLACEMENT: (i32, i32) = (1, 1);

    /// Radius around the line root where trail segments are ignored
    pub const EXCLUSION_RADIUS: f32 = 1.0;
    /// Edge length of the square region around the root that gets colliders
    pub const OUTER_REGION_SIZE: f32 = 12.0;
    /// Thickness of a trail collider
    pub const COLLIDER_WIDTH: f32 = 0.5;
    /// Minimum distance between two recorded trail samples
    pub const LINE_INTERVAL: f32 = 0.05;

    /// Root travel speed (world units/s)
    pub const ROOT_SPEED: f32 = 1.0;
    /// Maximum heading turn rate (degrees/s)
    pub const ROOT_ANGULAR_SPEED: f32 = 90.0;

    /// Halvings of the remaining shrink gap before the picker falls back to full bounds
    pub const MAX_RELAXATIONS: u32 = 32;
}

/// Planar angle (radians) of a box whose local X axis points along `dir`.
///
/// Builds the "up" vector as `Z × dir` and then faces along the segment with
/// that up, so segments drawn right-to-left get a half-turn instead of being
/// mirrored onto the same angle as their left-to-right twin.
#[inline]
pub fn facing_angle(dir: Vec2) -> f32 {
    let up = Vec3::Z.cross(dir.extend(0.0));
    let right = up.cross(Vec3::Z);
    if right.truncate().length_squared() == 0.0 {
        return 0.0;
    }
    right.y.atan2(right.x)
}

/// Right-hand perpendicular `(v.y, -v.x)`
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}
