//! Spiral Invaders - a tank-vs-invaders arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, entity lifecycles)
//! - `tuning`: Data-driven game balance
//!
//! Presentation, input polling and audio live outside this crate; they read
//! entity snapshots from [`sim::GameState`] and feed [`sim::TickInput`]s back.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// These are the defaults behind [`Tuning`]. Screen coordinates: origin at the
/// top-left corner, Y grows downward.
pub mod consts {
    /// Fixed simulation timestep (100 Hz)
    pub const SIM_DT: f64 = 1.0 / 100.0;

    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Spiral balls
    pub const BALL_SPEED: f32 = 10.0;
    /// Ball radius (the ball's bounding box is twice this on each side)
    pub const BALL_SIZE: f32 = 15.0;
    /// Balls released by an enemy when it reaches its hold altitude
    pub const BALLS_NUMBER: usize = 8;
    /// Radius growth per update
    pub const BALL_RADIUS_STEP: f32 = BALL_SPEED / 10.0;
    /// Angular growth per update (degrees)
    pub const BALL_ANGLE_STEP_DEG: f32 = BALL_SPEED / 5.0;

    /// Enemies
    pub const ENEMY_CAP: usize = 5;
    pub const ENEMY_WIDTH: f32 = 48.0;
    pub const ENEMY_HEIGHT: f32 = 48.0;
    /// Downward speed while descending (units per tick)
    pub const ENEMY_SPEED: f32 = 6.0;
    /// Hold altitude is drawn uniformly from this inclusive range
    pub const ENEMY_BOUND_MIN: i32 = 50;
    pub const ENEMY_BOUND_MAX: i32 = 200;
    /// Seconds before an enemy is recycled back to the top
    pub const ENEMY_LIFETIME: f64 = 5.0;

    /// Beams (auto-fire)
    pub const BEAM_PERIOD: u64 = 12;
    pub const BEAM_SPEED: f32 = 10.0;
    /// Firing angle in degrees, 90 = straight up
    pub const BEAM_ANGLE_DEG: f32 = 90.0;
    pub const BEAM_WIDTH: f32 = 8.0;
    pub const BEAM_HEIGHT: f32 = 32.0;

    /// Tank (top-left start position)
    pub const TANK_START_X: f32 = 300.0;
    pub const TANK_START_Y: f32 = 500.0;
    pub const TANK_WIDTH: f32 = 50.0;
    pub const TANK_HEIGHT: f32 = 50.0;
    /// Horizontal distance per move input
    pub const TANK_STEP: f32 = 10.0;

    /// Obstacles
    pub const OBSTACLE_CAP: usize = 3;
    pub const OBSTACLE_WIDTH: f32 = 100.0;
    pub const OBSTACLE_HEIGHT: f32 = 20.0;
    /// Vertical band (top edge) obstacles spawn in
    pub const OBSTACLE_Y_MIN: i32 = 200;
    pub const OBSTACLE_Y_MAX: i32 = 400;
    /// Whole seconds between obstacle spawns, drawn from this inclusive range
    pub const OBSTACLE_INTERVAL_MIN: u32 = 1;
    pub const OBSTACLE_INTERVAL_MAX: u32 = 3;
    pub const OBSTACLE_DURABILITY: u32 = 20;

    /// Shield
    pub const SHIELD_RADIUS: f32 = 100.0;
    /// Updates a shield survives after being raised
    pub const SHIELD_LIFE: i32 = 300;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit direction for a firing angle in degrees.
///
/// 90° points straight up the screen, so the Y component is negated.
/// Rounding noise on the axes is snapped to zero so axis-aligned shots
/// never drift.
#[inline]
pub fn firing_direction(angle_deg: f32) -> Vec2 {
    let theta = f64::from(angle_deg).to_radians();
    let snap = |v: f64| if v.abs() < f64::from(f32::EPSILON) { 0.0 } else { v as f32 };
    Vec2::new(snap(theta.cos()), snap(-theta.sin()))
}
