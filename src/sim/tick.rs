//! Fixed-order simulation tick
//!
//! One call advances the game by one frame: input, spawns, motion, the
//! collision passes, then lifecycle pruning.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{self, Body, RemovalPolicy};
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Move the tank left this tick
    pub move_left: bool,
    /// Move the tank right this tick
    pub move_right: bool,
    /// Raise a shield (edge-triggered: set only on the press tick)
    pub fire_shield: bool,
}

/// Advance the game state by one tick of `dt` seconds.
///
/// All randomness comes through `rng`, so a seeded generator and a fixed
/// input trace reproduce a run exactly. Does nothing once the run is over.
pub fn tick<R: Rng>(state: &mut GameState, input: &TickInput, dt: f64, rng: &mut R) {
    state.events.clear();
    if state.phase == GamePhase::GameOver {
        return;
    }

    let frame = state.time_ticks;
    state.time_ticks += 1;
    state.clock += dt;

    apply_input(state, input);

    state.spawn_enemy_if_needed(rng);
    state.fire_beam_if_due(frame);
    state.spawn_obstacle_if_due(rng);
    state.expire_obstacles();

    advance_motion(state, rng);

    resolve_projectiles(state);
    resolve_obstacles(state);
    check_tank(state);

    state.wear_shields();
    state.prune();
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let step = state.tuning.tank_step;
    if input.move_left {
        state.tank.move_left(step, 0.0);
    }
    if input.move_right {
        state.tank.move_right(step, state.field.width);
    }
    if input.fire_shield {
        state.raise_shield();
    }
}

fn advance_motion<R: Rng>(state: &mut GameState, rng: &mut R) {
    let tuning = &state.tuning;
    let now = state.clock;

    // Balls released this tick start moving on the next one
    for (_, ball) in state.balls.iter_mut() {
        ball.advance(tuning.ball_radius_step, tuning.ball_angle_step);
    }

    let mut escaped = Vec::new();
    for (handle, beam) in state.beams.iter_mut() {
        beam.advance();
        if !state.field.check(&beam.rect()).vertical {
            escaped.push(handle);
        }
    }
    for handle in escaped {
        state.beams.remove(handle);
    }

    for (handle, enemy) in state.enemies.iter_mut() {
        if enemy.should_hold() {
            let count = enemy.hold(&mut state.balls, tuning);
            log::debug!(
                "Enemy {:?} holding at y={} with {} balls",
                handle,
                enemy.center.y,
                count
            );
            state.events.push(GameEvent::BallsReleased {
                enemy: handle,
                count,
            });
        }
        enemy.advance();
        if enemy.is_expired(now, tuning.enemy_lifetime) {
            enemy.reset(&mut state.balls, tuning, rng, now);
            log::debug!("Enemy {:?} reset at {:.2}s", handle, now);
            state.events.push(GameEvent::EnemyReset { enemy: handle });
        }
    }

    for (_, shield) in state.shields.iter_mut() {
        shield.track(&state.tank);
    }
}

/// Shields, then beams, against everything in flight
fn resolve_projectiles(state: &mut GameState) {
    let deflected = collision::resolve(&mut state.shields, &mut state.balls, RemovalPolicy::ONLY_B);
    for contact in &deflected {
        state.events.push(GameEvent::BallDeflected { ball: contact.b });
    }

    let shot = collision::resolve(&mut state.beams, &mut state.balls, RemovalPolicy::BOTH);
    for contact in &shot {
        state.events.push(GameEvent::BallShot { ball: contact.b });
    }

    let kills = collision::resolve(&mut state.beams, &mut state.enemies, RemovalPolicy::BOTH);
    for contact in &kills {
        state.score_up(1);
        state.events.push(GameEvent::EnemyDestroyed { enemy: contact.b });
    }

    log::trace!(
        "tick {}: {} deflected, {} balls shot, {} enemies destroyed",
        state.time_ticks,
        deflected.len(),
        shot.len(),
        kills.len()
    );
}

/// Each obstacle soaks up the balls touching it, one durability per ball
fn resolve_obstacles(state: &mut GameState) {
    let mut events = Vec::new();
    collision::resolve_sequential(&mut state.obstacles, &mut state.balls, |handle, obstacle| {
        let destroyed = obstacle.hit();
        events.push(GameEvent::ObstacleHit {
            obstacle: handle,
            durability: obstacle.durability,
        });
        if destroyed {
            log::debug!("Obstacle {:?} destroyed", handle);
            events.push(GameEvent::ObstacleDestroyed { obstacle: handle });
        }
        destroyed
    });
    state.events.extend(events);
}

fn check_tank(state: &mut GameState) {
    let struck = collision::hits(&state.tank.rect(), &state.balls);
    if let Some(&ball) = struck.first() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::TankHit { ball });
        log::info!(
            "Game over at tick {} ({:.2}s), score {}",
            state.time_ticks,
            state.clock,
            state.score
        );
    }
}
