//! Disc Sim entry point
//!
//! Headless native runner: builds a preset or a JSON scene, runs it for a fixed
//! number of frames and logs a summary.
//!
//! Usage: `disc-sim [preset | scene.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "pinball".to_string());
    let frames: u64 = match args.next().map(|s| s.parse()) {
        None => 600,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("Bad frame count: {}", e);
            std::process::exit(2);
        }
    };

    let config = match load_config(&source) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    run(config, frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts on the web drive the library directly
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(source: &str) -> Result<disc_sim::SceneConfig, disc_sim::ConfigError> {
    use disc_sim::presets;

    if let Some(config) = presets::by_name(source, seed_from_time()) {
        return Ok(config);
    }
    if source.ends_with(".json") {
        return disc_sim::SceneConfig::load(source);
    }
    Err(disc_sim::ConfigError::Invalid(format!(
        "unknown scene '{}', expected one of {:?} or a .json file",
        source,
        presets::PRESET_NAMES
    )))
}

#[cfg(not(target_arch = "wasm32"))]
fn seed_from_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
fn run(config: disc_sim::SceneConfig, frames: u64) {
    use disc_sim::FrameClock;
    use disc_sim::sim::{InputEvent, Scene, SimEvent};

    let mut scene = Scene::new(config);
    if scene.paused {
        scene.toggle_pause();
    }

    let dt = scene.dt;
    let mut clock = FrameClock::new(dt);
    let mut absorbed = 0;
    let mut spawned = 0;
    let mut max_force: f32 = 0.0;

    log::info!("Disc Sim running '{}' for {} frames", scene.config().name, frames);

    while scene.frame < frames {
        // Flick every flipper for a quarter second out of each second
        if !scene.flippers.is_empty() {
            let phase = scene.frame % 60;
            for i in 0..scene.flippers.len() {
                if phase == 0 {
                    clock.push_input(InputEvent::FlipperPressed(i));
                } else if phase == 15 {
                    clock.push_input(InputEvent::FlipperReleased(i));
                }
            }
        }

        clock.update(&mut scene, dt);
        max_force = max_force.max(scene.stats.max_constraint_force);

        for event in scene.drain_events() {
            match event {
                SimEvent::BallAbsorbed { .. } => absorbed += 1,
                SimEvent::BallSpawned { .. } => spawned += 1,
                SimEvent::SpawnRejected { .. } | SimEvent::ObstacleHit { .. } => {}
            }
        }

        if !scene.is_finite() {
            log::warn!("Non-finite state at frame {}, stopping", scene.frame);
            break;
        }
    }

    log::info!(
        "Frame {}: {} balls, {} beads, score {}, {} absorbed, {} spawned",
        scene.frame,
        scene.balls.len(),
        scene.beads.len(),
        scene.score,
        absorbed,
        spawned
    );
    log::info!(
        "Kinetic energy {:.4}, max constraint force {:.4}",
        scene.kinetic_energy(),
        max_force
    );
}
