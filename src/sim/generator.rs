//! Procedural level generation
//!
//! The generator follows a tracked position down an endless grid. Every step
//! it looks at the window of cells around that position, scans row bands from
//! the top and asks the catalog to fill the first gap it finds: a fully empty
//! band, or the free space left or right of what is already placed. At most
//! one object is placed per step; a step that finds nothing is normal and the
//! next step simply tries again (the window moves, or the catalog draws
//! differently).
//!
//! The generator is an explicit resumable task. The host calls [`step`]
//! once per tick until the tracked object goes away and the task is cancelled.
//!
//! [`step`]: LevelGenerator::step

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, Footprint, Placeable};
use super::occupancy::{ColumnRange, OccupancyTable};
use crate::settings::LevelSettings;

/// Shared stop flag for a running generator
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Where a placement was found relative to existing content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementSide {
    /// Band had nothing in it
    Open,
    /// Left of the band's occupied span
    Left,
    /// Right of the band's occupied span
    Right,
}

/// An object instantiated by the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Catalog name of the placed object
    pub name: String,
    /// Top-left cell (column, row)
    pub origin: IVec2,
    /// Cells covered after rotation
    pub footprint: Footprint,
    /// World-space position of the object
    pub position: Vec2,
    /// Rotation about Z in degrees (multiple of 90)
    pub rotation_deg: f32,
    pub side: PlacementSide,
}

impl Placement {
    /// Whether two placements share any cell
    pub fn overlaps(&self, other: &Placement) -> bool {
        let (a_min, a_max) = self.cell_range();
        let (b_min, b_max) = other.cell_range();
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// Covered cells as a half-open `[min, max)` rectangle
    pub fn cell_range(&self) -> (IVec2, IVec2) {
        let size = IVec2::new(self.footprint.width, self.footprint.height);
        (self.origin, self.origin + size)
    }

    /// Every covered cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        let (min, max) = self.cell_range();
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| IVec2::new(x, y)))
    }
}

/// Inclusive cell window scanned in one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationBounds {
    pub min: IVec2,
    pub max: IVec2,
}

/// Incremental level generator over a growing occupancy table
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    settings: LevelSettings,
    table: OccupancyTable,
    placements: Vec<Placement>,
    cancel: CancelToken,
    steps: u64,
}

impl LevelGenerator {
    pub fn new(settings: LevelSettings) -> Self {
        Self::with_table(settings, OccupancyTable::new())
    }

    /// Resume from an existing table
    pub fn with_table(settings: LevelSettings, table: OccupancyTable) -> Self {
        Self {
            settings,
            table,
            placements: Vec::new(),
            cancel: CancelToken::new(),
            steps: 0,
        }
    }

    pub fn table(&self) -> &OccupancyTable {
        &self.table
    }

    /// Every placement made so far, in order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Token the owner of the tracked object can use to stop the generator
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Grid cell containing `world` (rows count downward from the origin)
    pub fn cell_of(&self, world: Vec2) -> IVec2 {
        let unit = self.settings.unit_length;
        let column = (world.x / unit).floor() as i32;
        let row = (-world.y / unit).floor() as i32;
        IVec2::new(column, row.max(0))
    }

    /// Window scanned around `cell` (row minimum clamped at 0)
    pub fn bounds_around(&self, cell: IVec2) -> GenerationBounds {
        let radius = self.settings.generation_radius;
        let mut min = cell - radius;
        min.y = min.y.max(0);
        let max = cell + radius;
        GenerationBounds { min, max }
    }

    /// Advance one tick. Places at most one object and returns it.
    pub fn step<C: Catalog, R: Rng + ?Sized>(
        &mut self,
        tracked: Vec2,
        catalog: &C,
        rng: &mut R,
    ) -> Option<Placement> {
        if self.is_cancelled() {
            return None;
        }
        self.steps += 1;

        let bounds = self.bounds_around(self.cell_of(tracked));
        self.table.extend(bounds.max.y as usize);

        let placement = self.scan(&bounds, catalog, rng)?;
        log::debug!(
            "Placed '{}' at cell {} ({:?}, {}x{}, {}°)",
            placement.name,
            placement.origin,
            placement.side,
            placement.footprint.width,
            placement.footprint.height,
            placement.rotation_deg
        );
        self.placements.push(placement.clone());
        Some(placement)
    }

    /// Nested band scan: top row ascending, then band height ascending.
    fn scan<C: Catalog, R: Rng + ?Sized>(
        &mut self,
        bounds: &GenerationBounds,
        catalog: &C,
        rng: &mut R,
    ) -> Option<Placement> {
        let (min_row, max_row) = (bounds.min.y as usize, bounds.max.y as usize);

        for y_min in min_row..=max_row {
            let mut merged: Option<ColumnRange> = None;

            for y_max in y_min..=max_row {
                let row = self.table.get(y_max);
                if !row.is_empty() {
                    merged = Some(merged.map_or(row, |m| m.merge(&row)));
                }
                let height = (y_max - y_min + 1) as i32;

                let placement = match merged {
                    None => self.try_open(bounds, y_min, height, catalog, rng),
                    Some(span) => self
                        .try_left(bounds, span, y_min, height, catalog, rng)
                        .or_else(|| self.try_right(bounds, span, y_min, height, catalog, rng)),
                };
                if placement.is_some() {
                    return placement;
                }
            }
        }
        None
    }

    /// Empty band: the whole column window is available.
    fn try_open<C: Catalog, R: Rng + ?Sized>(
        &mut self,
        bounds: &GenerationBounds,
        y_min: usize,
        height: i32,
        catalog: &C,
        rng: &mut R,
    ) -> Option<Placement> {
        let x_min = bounds.min.x;
        let max = Footprint::new(bounds.max.x - x_min + 1, height);
        let (def, quarter_turns, size) = self.query(catalog, y_min, max, rng)?;

        let range = ColumnRange::new(x_min - 1, x_min + size.width);
        for y in y_min..y_min + size.height as usize {
            self.table.set(y, range);
        }
        Some(self.placement(def, x_min, y_min, size, quarter_turns, PlacementSide::Open))
    }

    /// Free space between the window's left edge and the band's span.
    fn try_left<C: Catalog, R: Rng + ?Sized>(
        &mut self,
        bounds: &GenerationBounds,
        span: ColumnRange,
        y_min: usize,
        height: i32,
        catalog: &C,
        rng: &mut R,
    ) -> Option<Placement> {
        let max = Footprint::new(span.left - bounds.min.x + 1, height);
        let (def, quarter_turns, size) = self.query(catalog, y_min, max, rng)?;

        let new_left = span.left - size.width;
        for y in y_min..y_min + size.height as usize {
            let row = self.table.get(y);
            let right = if row.is_empty() { span.left + 1 } else { row.right };
            self.table.set(y, ColumnRange::new(new_left, right));
        }
        Some(self.placement(def, new_left + 1, y_min, size, quarter_turns, PlacementSide::Left))
    }

    /// Free space between the band's span and the window's right edge.
    fn try_right<C: Catalog, R: Rng + ?Sized>(
        &mut self,
        bounds: &GenerationBounds,
        span: ColumnRange,
        y_min: usize,
        height: i32,
        catalog: &C,
        rng: &mut R,
    ) -> Option<Placement> {
        let max = Footprint::new(bounds.max.x - span.right + 1, height);
        let (def, quarter_turns, size) = self.query(catalog, y_min, max, rng)?;

        let new_right = span.right + size.width;
        for y in y_min..y_min + size.height as usize {
            let row = self.table.get(y);
            let left = if row.is_empty() { span.right - 1 } else { row.left };
            self.table.set(y, ColumnRange::new(left, new_right));
        }
        Some(self.placement(def, span.right, y_min, size, quarter_turns, PlacementSide::Right))
    }

    /// Threshold check, catalog draw and rotation draw for one candidate.
    /// Returns the definition, its quarter turns and the rotated footprint.
    fn query<'c, C: Catalog, R: Rng + ?Sized>(
        &self,
        catalog: &'c C,
        row: usize,
        max: Footprint,
        rng: &mut R,
    ) -> Option<(&'c Placeable, u8, Footprint)> {
        let threshold = self.settings.min_placement;
        if max.width < threshold.x || max.height < threshold.y {
            return None;
        }
        let def = catalog.pick(row, max, rng)?;
        if !def.footprint.fits_within(max) {
            log::warn!(
                "Catalog returned '{}' ({}x{}) for a {}x{} slot; skipping",
                def.name,
                def.footprint.width,
                def.footprint.height,
                max.width,
                max.height
            );
            return None;
        }

        let quarter_turns = if !def.rotatable {
            0
        } else if def.footprint.transposed().fits_within(max) {
            rng.random_range(0..4u8)
        } else {
            // Only half turns keep a non-square footprint inside the slot
            rng.random_range(0..2u8) * 2
        };
        let size = if quarter_turns % 2 == 1 {
            def.footprint.transposed()
        } else {
            def.footprint
        };
        Some((def, quarter_turns, size))
    }

    fn placement(
        &self,
        def: &Placeable,
        column: i32,
        row: usize,
        size: Footprint,
        quarter_turns: u8,
        side: PlacementSide,
    ) -> Placement {
        let unit = self.settings.unit_length;
        let position = Vec2::new(
            column as f32 + size.width as f32 / 2.0,
            -(row as f32 + size.height as f32 / 2.0 - 1.0),
        ) * unit;
        Placement {
            name: def.name.clone(),
            origin: IVec2::new(column, row as i32),
            footprint: size,
            position,
            rotation_deg: quarter_turns as f32 * 90.0,
            side,
        }
    }
}
