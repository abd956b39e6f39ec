//! Level state and core simulation types
//!
//! Everything the per-tick update reads or writes lives here, owned in one
//! place so the host loop only has to hand in the root position.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::ColliderPool;
use super::generator::LevelGenerator;
use super::polyline::{LineSet, Segment};
use super::respawn::DestinationPicker;
use crate::error::Result;
use crate::settings::Settings;

/// Complete simulation state for one level run
#[derive(Debug, Clone)]
pub struct LevelState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    /// Current line root (head of the trail)
    pub root: Vec2,
    /// Every polyline drawn so far
    pub lines: LineSet,
    /// Trail colliders around the root
    pub colliders: ColliderPool,
    pub generator: LevelGenerator,
    pub picker: DestinationPicker,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    /// Reused segment buffer
    pub(crate) segments: Vec<Segment>,
}

impl LevelState {
    /// Validate settings and start a run with the root at `spawn`.
    pub fn new(settings: Settings, spawn: Vec2) -> Result<Self> {
        settings.validate()?;

        let mut lines = LineSet::new();
        lines.begin_line(spawn);

        log::info!(
            "Level started: seed={} spawn={} unit={} radius={}",
            settings.seed,
            spawn,
            settings.level.unit_length,
            settings.level.generation_radius
        );

        Ok(Self {
            seed: settings.seed,
            root: spawn,
            lines,
            colliders: ColliderPool::new(),
            generator: LevelGenerator::new(settings.level.clone()),
            picker: DestinationPicker::default(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(settings.seed),
            segments: Vec::new(),
            settings,
        })
    }

    /// Segments that received colliders on the last tick
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Stop level generation (the tracked object is gone)
    pub fn stop(&self) {
        if !self.generator.is_cancelled() {
            log::info!(
                "Level generation stopped after {} steps, {} placements",
                self.generator.steps(),
                self.generator.placements().len()
            );
        }
        self.generator.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineRunnerError;

    #[test]
    fn test_new_state_starts_a_line() {
        let state = LevelState::new(Settings::default(), Vec2::new(1.0, 2.0)).unwrap();
        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.lines.current().unwrap().points(), &[Vec2::new(1.0, 2.0)]);
        assert_eq!(state.root, Vec2::new(1.0, 2.0));
        assert_eq!(state.colliders.capacity(), 0);
    }

    #[test]
    fn test_new_state_rejects_bad_settings() {
        let mut settings = Settings::default();
        settings.line.outer_region_size = settings.line.exclusion_radius;
        assert!(matches!(
            LevelState::new(settings, Vec2::ZERO),
            Err(LineRunnerError::OuterRegionTooSmall { .. })
        ));
    }

    #[test]
    fn test_stop_cancels_generator() {
        let state = LevelState::new(Settings::default(), Vec2::ZERO).unwrap();
        state.stop();
        assert!(state.generator.is_cancelled());
        state.stop();
    }
}
