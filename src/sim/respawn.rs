//! Respawn destination picker
//!
//! Chooses where the line continues after a respawn: a random point of the
//! existing trail that lies inside a shrunken copy of the whole trail bounds
//! and away from the root. When the shrunken window holds nothing usable the
//! window is relaxed toward the full bounds and the search repeats.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::polyline::PolylineSource;
use crate::consts::MAX_RELAXATIONS;
use crate::perpendicular;

/// Where and in which direction to resume drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Unit heading, perpendicular to the trail at `location`
    pub direction: Vec2,
    pub location: Vec2,
    /// Index of the polyline the point was taken from
    pub line: usize,
    /// Index of the point within that polyline (never 0)
    pub index: usize,
    /// Shrink fraction that produced the candidate
    pub range: f32,
}

/// Picks respawn destinations from a fraction of the trail bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestinationPicker {
    /// Fraction of the whole bounds searched first, in [0, 1]
    pub range: f32,
}

impl Default for DestinationPicker {
    fn default() -> Self {
        Self { range: 0.5 }
    }
}

impl DestinationPicker {
    pub fn new(range: f32) -> Self {
        Self {
            range: range.clamp(0.0, 1.0),
        }
    }

    /// Pick a destination, or `None` when no trail point outside the
    /// exclusion circle exists even in the full bounds.
    pub fn pick<S, R>(&self, source: &S, root: Vec2, exclusion_radius: f32, rng: &mut R) -> Option<Destination>
    where
        S: PolylineSource + ?Sized,
        R: Rng + ?Sized,
    {
        let whole = source.whole_bounds()?;
        let mut range = self.range;
        let mut candidates = collect_candidates(source, &whole.shrunk(range), root, exclusion_radius);

        let mut relaxations = 0;
        while candidates.is_empty() {
            if range >= 1.0 {
                log::warn!("No respawn point outside radius {exclusion_radius} around {root}");
                return None;
            }
            relaxations += 1;
            range = if relaxations >= MAX_RELAXATIONS {
                1.0
            } else {
                (range + 1.0) / 2.0
            };
            candidates = collect_candidates(source, &whole.shrunk(range), root, exclusion_radius);
        }

        let &(line, index) = candidates.choose(rng)?;
        let points = source.polylines()[line].points();
        let normal = perpendicular(points[index] - points[index - 1]).normalize_or_zero();
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        Some(Destination {
            direction: normal * sign,
            location: points[index],
            line,
            index,
            range,
        })
    }
}

/// (line, point) pairs inside `region` and strictly beyond the exclusion
/// radius. The first point of each line has no incoming segment and is skipped.
fn collect_candidates<S: PolylineSource + ?Sized>(
    source: &S,
    region: &Aabb,
    root: Vec2,
    exclusion_radius: f32,
) -> Vec<(usize, usize)> {
    let mut candidates = Vec::new();
    for (line_index, line) in source.polylines().iter().enumerate() {
        if !line.bounds().is_some_and(|b| b.intersects(region)) {
            continue;
        }
        for (index, point) in line.points().iter().enumerate().skip(1) {
            if region.contains(*point) && root.distance(*point) > exclusion_radius {
                candidates.push((line_index, index));
            }
        }
    }
    candidates
}
