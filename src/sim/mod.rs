//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (the host moves the root, then calls `tick`)
//! - Seeded RNG only
//! - Stable iteration order (lines and points in recording order)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod catalog;
pub mod collision;
pub mod generator;
pub mod occupancy;
pub mod polyline;
pub mod respawn;
pub mod segments;
pub mod state;
pub mod tick;

pub use bounds::Aabb;
pub use catalog::{Catalog, Footprint, Placeable, SceneCatalog};
pub use collision::{ColliderBox, ColliderPool};
pub use generator::{CancelToken, GenerationBounds, LevelGenerator, Placement, PlacementSide};
pub use occupancy::{ColumnRange, OccupancyTable};
pub use polyline::{LineSet, Polyline, PolylineSource, Segment};
pub use respawn::{Destination, DestinationPicker};
pub use segments::collect_segments;
pub use state::LevelState;
pub use tick::{TickInput, TickOutput, respawn, tick};
