//! Line Runner headless host
//!
//! Drives the simulation at the fixed timestep with a scripted steering
//! input and logs what the level does. Usage:
//!
//! ```text
//! line-runner [settings.json] [catalog.json] [ticks]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Line Runner (native) starting...");

    if let Err(e) = native::run(std::env::args().skip(1).collect()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a web host; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;

    use line_runner::Result;
    use line_runner::consts::SIM_DT;
    use line_runner::settings::{Settings, SteeringSettings};
    use line_runner::sim::{LevelState, Placeable, SceneCatalog, TickInput, respawn, tick};

    const DEFAULT_TICKS: u64 = 1800;
    const HEAD_RADIUS: f32 = 0.2;

    pub fn run(args: Vec<String>) -> Result<()> {
        let settings = match args.first() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let catalog = match args.get(1) {
            Some(path) => SceneCatalog::load(path)?,
            None => demo_catalog(),
        };
        let ticks = args
            .get(2)
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TICKS);

        let mut state = LevelState::new(settings, Vec2::ZERO)?;
        let mut heading = Vec2::NEG_Y;
        let mut respawns = 0;

        for i in 0..ticks {
            let target = wander_target(i);
            heading = steer(heading, target, &state.settings.steering);
            let root = state.root + heading * state.settings.steering.speed * SIM_DT;

            let out = tick(
                &mut state,
                &catalog,
                &TickInput {
                    root,
                    head_radius: Some(HEAD_RADIUS),
                },
            );

            if let Some(placed) = &out.placement {
                log::info!(
                    "tick {}: placed {} at {} ({}°, {:?})",
                    state.time_ticks,
                    placed.name,
                    placed.position,
                    placed.rotation_deg,
                    placed.side
                );
            }

            if let Some(hit) = out.self_hit {
                log::info!("tick {}: head touched trail collider {hit}", state.time_ticks);
                match respawn(&mut state) {
                    Some(dest) => {
                        heading = dest.direction;
                        respawns += 1;
                    }
                    None => {
                        log::warn!("No respawn destination, stopping");
                        break;
                    }
                }
            }
        }

        state.stop();
        log::info!(
            "Finished after {} ticks: {} lines, {} placements, {} respawns, {} rows tracked",
            state.time_ticks,
            state.lines.len(),
            state.generator.placements().len(),
            respawns,
            state.generator.table().len()
        );
        Ok(())
    }

    /// Slow left/right weave while descending
    fn wander_target(tick: u64) -> Vec2 {
        let phase = tick as f32 * SIM_DT * 0.5;
        Vec2::new(phase.sin(), -1.0).normalize()
    }

    /// Turn `heading` toward `target`, limited by the configured turn rate
    fn steer(heading: Vec2, target: Vec2, steering: &SteeringSettings) -> Vec2 {
        let max_turn = steering.angular_speed.to_radians() * SIM_DT;
        let angle = heading.angle_to(target).clamp(-max_turn, max_turn);
        Vec2::from_angle(angle).rotate(heading).normalize_or(heading)
    }

    fn demo_catalog() -> SceneCatalog {
        let mut catalog = SceneCatalog::new(
            "demo",
            vec![
                Placeable::new("pebble", 1, 1).with_weight(3.0),
                Placeable::new("rock", 2, 2).rotatable(),
                Placeable::new("log", 3, 1).rotatable(),
                Placeable::new("ridge", 5, 2).with_rows(8, None),
            ],
        );
        catalog.descent_speed = 1.0;
        catalog
    }
}
