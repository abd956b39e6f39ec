//! Per-tick level update
//!
//! Runs after the host has moved the line root for this tick: record the
//! trail sample, rebuild trail colliders around the root, then give the level
//! generator its single step.

use glam::Vec2;

use super::bounds::Aabb;
use super::catalog::Catalog;
use super::generator::Placement;
use super::respawn::Destination;
use super::segments::collect_segments;
use super::state::LevelState;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Root position after this tick's movement
    pub root: Vec2,
    /// Head radius to test against the trail colliders (skipped when `None`)
    pub head_radius: Option<f32>,
}

/// What changed during a tick
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Whether the root produced a new trail sample
    pub recorded: bool,
    /// Object placed by the generator this tick
    pub placement: Option<Placement>,
    /// Number of enabled trail colliders
    pub active_colliders: usize,
    /// Collider the head touched, if any
    pub self_hit: Option<usize>,
}

/// Advance the level by one tick
pub fn tick<C: Catalog>(state: &mut LevelState, catalog: &C, input: &TickInput) -> TickOutput {
    state.time_ticks += 1;
    state.root = input.root;

    let line = &state.settings.line;
    let recorded = state.lines.record(state.root, line.line_interval);

    let outer = Aabb::square(state.root, line.outer_region_size);
    collect_segments(
        &state.lines,
        state.root,
        line.exclusion_radius,
        &outer,
        &mut state.segments,
    );
    state.colliders.bind(&state.segments, line.collider_width);

    let self_hit = input
        .head_radius
        .and_then(|radius| state.colliders.hit_test(state.root, radius));

    let placement = state.generator.step(state.root, catalog, &mut state.rng);

    TickOutput {
        recorded,
        placement,
        active_colliders: state.colliders.active(),
        self_hit,
    }
}

/// Move the root to a new point on the existing trail and start a new line
/// there. Returns the destination with the heading to resume along.
pub fn respawn(state: &mut LevelState) -> Option<Destination> {
    let dest = state.picker.pick(
        &state.lines,
        state.root,
        state.settings.line.exclusion_radius,
        &mut state.rng,
    )?;
    state.root = dest.location;
    state.lines.begin_line(dest.location);
    log::info!(
        "Respawned at {} heading {} (line {}, point {}, range {})",
        dest.location,
        dest.direction,
        dest.line,
        dest.index,
        dest.range
    );
    Some(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::catalog::{Placeable, SceneCatalog};

    fn catalog() -> SceneCatalog {
        SceneCatalog::new(
            "test",
            vec![
                Placeable::new("rock", 1, 1),
                Placeable::new("boulder", 2, 2).rotatable(),
                Placeable::new("ledge", 3, 1),
            ],
        )
    }

    /// Straight descent at unit speed
    fn run(state: &mut LevelState, catalog: &SceneCatalog, ticks: u32) -> Vec<TickOutput> {
        (0..ticks)
            .map(|_| {
                let root = state.root + Vec2::new(0.0, -1.0);
                tick(state, catalog, &TickInput { root, head_radius: Some(0.1) })
            })
            .collect()
    }

    #[test]
    fn test_tick_records_and_binds() {
        let mut state = LevelState::new(Settings::default(), Vec2::ZERO).unwrap();
        let catalog = catalog();
        let outputs = run(&mut state, &catalog, 120);

        assert_eq!(state.time_ticks, 120);
        assert!(outputs.iter().all(|o| o.recorded));
        assert_eq!(state.lines.current().unwrap().len(), 121);

        // Straight line: everything behind the root past the exclusion circle
        // and inside the outer square gets a collider, nothing touches the head
        let last = outputs.last().unwrap();
        assert!(last.active_colliders > 0);
        assert_eq!(last.active_colliders, state.segments().len());
        assert!(outputs.iter().all(|o| o.self_hit.is_none()));
        for seg in state.segments() {
            assert!(seg.to.distance(state.root) > state.settings.line.exclusion_radius);
        }
    }

    #[test]
    fn test_generator_places_at_most_once_per_tick() {
        let mut state = LevelState::new(Settings::default(), Vec2::ZERO).unwrap();
        let catalog = catalog();
        let outputs = run(&mut state, &catalog, 30);
        let placed = outputs.iter().filter(|o| o.placement.is_some()).count();
        assert!(placed > 0);
        assert_eq!(placed, state.generator.placements().len());
    }

    #[test]
    fn test_stopped_level_places_nothing() {
        let mut state = LevelState::new(Settings::default(), Vec2::ZERO).unwrap();
        state.stop();
        let outputs = run(&mut state, &catalog(), 30);
        assert!(outputs.iter().all(|o| o.placement.is_none()));
        // Trail colliders keep working
        assert!(outputs.last().unwrap().active_colliders > 0);
    }

    #[test]
    fn test_self_hit_when_crossing_trail() {
        let mut settings = Settings::default();
        settings.line.exclusion_radius = 0.2;
        let mut state = LevelState::new(settings, Vec2::new(-3.0, 0.0)).unwrap();
        let catalog = SceneCatalog::default();
        // Draw a horizontal line to the right, loop down and come back up through it
        for x in 1..=12 {
            let root = Vec2::new(-3.0 + x as f32 * 0.5, 0.0);
            tick(&mut state, &catalog, &TickInput { root, head_radius: None });
        }
        let path = [Vec2::new(3.0, -2.0), Vec2::new(0.0, -2.0), Vec2::new(0.0, -0.1)];
        let mut hit = None;
        for root in path {
            hit = tick(&mut state, &catalog, &TickInput { root, head_radius: Some(0.3) }).self_hit;
        }
        assert!(hit.is_some());
    }

    #[test]
    fn test_respawn_starts_new_line() {
        let mut state = LevelState::new(Settings::default(), Vec2::ZERO).unwrap();
        let catalog = catalog();
        run(&mut state, &catalog, 240);

        let before = state.root;
        let dest = respawn(&mut state).unwrap();
        assert_eq!(state.lines.len(), 2);
        assert_eq!(state.root, dest.location);
        assert!(dest.location.distance(before) > state.settings.line.exclusion_radius);
        assert!((dest.direction.length() - 1.0).abs() < 1e-5);
        assert_eq!(state.lines.current().unwrap().points(), &[dest.location]);
    }

    #[test]
    fn test_determinism() {
        let catalog = catalog();
        let mut a = LevelState::new(Settings::default(), Vec2::ZERO).unwrap();
        let mut b = LevelState::new(Settings::default(), Vec2::ZERO).unwrap();
        run(&mut a, &catalog, 90);
        run(&mut b, &catalog, 90);
        assert_eq!(a.generator.placements(), b.generator.placements());
        assert_eq!(a.generator.table(), b.generator.table());
        assert_eq!(respawn(&mut a), respawn(&mut b));
    }
}
