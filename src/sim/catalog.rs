//! Scene-object catalog
//!
//! The generator asks the catalog for "something at most this big for this
//! row" and either gets a definition back or keeps scanning. Selection is a
//! weighted draw from an injected RNG, so runs are reproducible and tests can
//! swap in their own [`Catalog`].

use std::fs;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{LineRunnerError, Result};

/// Size of a placeable in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: i32,
    pub height: i32,
}

impl Footprint {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether this footprint fits inside `max` without rotation
    #[inline]
    pub fn fits_within(&self, max: Footprint) -> bool {
        self.width <= max.width && self.height <= max.height
    }

    /// Footprint after a quarter turn
    #[inline]
    pub fn transposed(&self) -> Footprint {
        Footprint::new(self.height, self.width)
    }

    #[inline]
    pub fn area(&self) -> i32 {
        self.width * self.height
    }
}

/// An object the generator can drop into the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeable {
    /// Prefab/asset key resolved by the host
    pub name: String,
    pub footprint: Footprint,
    /// May be placed at any multiple of 90°
    #[serde(default)]
    pub rotatable: bool,
    /// Base selection weight
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Weight change per row of depth (negative fades an object out)
    #[serde(default)]
    pub weight_per_row: f32,
    /// First row this object may appear on
    #[serde(default)]
    pub min_row: usize,
    /// Last row this object may appear on (unbounded when absent)
    #[serde(default)]
    pub max_row: Option<usize>,
}

fn default_weight() -> f32 {
    1.0
}

impl Placeable {
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            footprint: Footprint::new(width, height),
            rotatable: false,
            weight: default_weight(),
            weight_per_row: 0.0,
            min_row: 0,
            max_row: None,
        }
    }

    pub fn rotatable(mut self) -> Self {
        self.rotatable = true;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_rows(mut self, min_row: usize, max_row: Option<usize>) -> Self {
        self.min_row = min_row;
        self.max_row = max_row;
        self
    }

    /// Whether `row` lies in this object's row window
    pub fn allows_row(&self, row: usize) -> bool {
        row >= self.min_row && self.max_row.is_none_or(|max| row <= max)
    }

    /// Selection weight at `row` (never negative)
    pub fn weight_at(&self, row: usize) -> f32 {
        (self.weight + self.weight_per_row * row as f32).max(0.0)
    }
}

/// Source of placeables for the level generator
pub trait Catalog {
    /// A definition whose footprint fits within `max` and that may appear at
    /// `row`, or `None` to keep scanning. Must not mutate catalog state.
    fn pick<R: Rng + ?Sized>(&self, row: usize, max: Footprint, rng: &mut R) -> Option<&Placeable>;
}

/// Data-driven catalog for one level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneCatalog {
    /// Level identifier reported to the host
    #[serde(default)]
    pub level_id: String,
    /// Speed the world scrolls downward in this level (world units/s)
    #[serde(default)]
    pub descent_speed: f32,
    pub objects: Vec<Placeable>,
}

impl SceneCatalog {
    pub fn new(level_id: impl Into<String>, objects: Vec<Placeable>) -> Self {
        Self {
            level_id: level_id.into(),
            descent_speed: 0.0,
            objects,
        }
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: SceneCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LineRunnerError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        log::info!(
            "Loaded catalog '{}' ({} objects) from {}",
            catalog.level_id,
            catalog.objects.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Reject definitions the generator could never place safely
    pub fn validate(&self) -> Result<()> {
        for object in &self.objects {
            if object.footprint.width < 1 || object.footprint.height < 1 {
                return Err(LineRunnerError::InvalidConfiguration(format!(
                    "placeable '{}' has an empty footprint {}x{}",
                    object.name, object.footprint.width, object.footprint.height
                )));
            }
            if !(object.weight >= 0.0) || !object.weight_per_row.is_finite() {
                return Err(LineRunnerError::InvalidConfiguration(format!(
                    "placeable '{}' has an invalid weight",
                    object.name
                )));
            }
            if object.max_row.is_some_and(|max| max < object.min_row) {
                return Err(LineRunnerError::InvalidConfiguration(format!(
                    "placeable '{}' has an empty row window",
                    object.name
                )));
            }
        }
        Ok(())
    }

    /// Definitions that could be picked for this row and size
    pub fn candidates(&self, row: usize, max: Footprint) -> Vec<&Placeable> {
        self.objects
            .iter()
            .filter(|o| o.footprint.fits_within(max) && o.allows_row(row) && o.weight_at(row) > 0.0)
            .collect()
    }
}

impl Catalog for SceneCatalog {
    fn pick<R: Rng + ?Sized>(&self, row: usize, max: Footprint, rng: &mut R) -> Option<&Placeable> {
        let candidates = self.candidates(row, max);
        candidates
            .choose_weighted(rng, |o| o.weight_at(row))
            .ok()
            .copied()
    }
}
