//! Spiral Invaders headless driver
//!
//! Runs one seeded game at the fixed step with a scripted pilot and prints
//! the final frame as JSON. Usage: `spiral-invaders [seed] [tuning.json]`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use spiral_invaders::Tuning;
use spiral_invaders::consts::SIM_DT;
use spiral_invaders::sim::{Body, GameEvent, GameState, TickInput, tick};

/// Give up after this many ticks (100 s of game time)
const MAX_TICKS: u64 = 10_000;

/// Raise a shield when a ball gets this close to the tank's center
const SHIELD_TRIGGER_DIST: f32 = 120.0;

fn load_tuning(path: Option<&str>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Bad tuning file {}: {}, using defaults", path, e);
                Tuning::default()
            }
        },
        Err(e) => {
            log::warn!("Cannot read {}: {}, using defaults", path, e);
            Tuning::default()
        }
    }
}

/// Sweep back and forth; shield up when something gets close
fn pilot(state: &GameState, heading_left: &mut bool) -> TickInput {
    let tank = state.tank.rect();
    if tank.left() <= 0.0 {
        *heading_left = false;
    } else if tank.right() >= state.field.width {
        *heading_left = true;
    }

    let threatened = state
        .balls
        .iter()
        .any(|(_, b)| b.rect().center().distance(tank.center()) < SHIELD_TRIGGER_DIST);

    TickInput {
        move_left: *heading_left,
        move_right: !*heading_left,
        fire_shield: threatened && state.shields.is_empty(),
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);
    let tuning = load_tuning(args.next().as_deref());

    log::info!("Spiral Invaders (headless) starting, seed {}", seed);
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut state = GameState::new(tuning, &mut rng);
    let mut heading_left = true;

    while !state.is_game_over() && state.time_ticks < MAX_TICKS {
        let input = pilot(&state, &mut heading_left);
        tick(&mut state, &input, SIM_DT, &mut rng);
        for event in &state.events {
            match event {
                GameEvent::EnemyDestroyed { .. } => {
                    log::info!("Enemy down, score {}", state.score)
                }
                GameEvent::TankHit { .. } => log::info!("Tank hit"),
                other => log::trace!("{:?}", other),
            }
        }
    }

    println!(
        "Finished after {} ticks ({:.2}s): score {}, {}",
        state.time_ticks,
        state.clock,
        state.score,
        if state.is_game_over() { "game over" } else { "survived" }
    );
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Could not serialize final frame: {}", e),
    }
}
