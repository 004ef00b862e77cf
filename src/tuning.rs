//! Data-driven game balance
//!
//! Every constant the simulation reads goes through [`Tuning`], so a driver
//! can load a JSON file and tests can switch individual systems off.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance values for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play-field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Spiral balls ===
    /// Ball radius; the bounding box is `2 * ball_size` square
    pub ball_size: f32,
    pub balls_number: usize,
    /// Spiral radius growth per update
    pub ball_radius_step: f32,
    /// Spiral angle growth per update (radians)
    pub ball_angle_step: f32,

    // === Enemies ===
    pub enemy_cap: usize,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
    pub enemy_bound_min: i32,
    pub enemy_bound_max: i32,
    /// Seconds
    pub enemy_lifetime: f64,

    // === Beams ===
    /// Ticks between automatic shots (0 disables auto-fire)
    pub beam_period: u64,
    pub beam_speed: f32,
    pub beam_angle_deg: f32,
    pub beam_width: f32,
    pub beam_height: f32,

    // === Tank ===
    pub tank_start_x: f32,
    pub tank_start_y: f32,
    pub tank_width: f32,
    pub tank_height: f32,
    pub tank_step: f32,

    // === Obstacles ===
    pub obstacle_cap: usize,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_y_min: i32,
    pub obstacle_y_max: i32,
    /// Whole seconds
    pub obstacle_interval_min: u32,
    pub obstacle_interval_max: u32,
    pub obstacle_durability: u32,
    /// Seconds an obstacle may stand before it expires (`None` = never)
    pub obstacle_lifetime: Option<f64>,

    // === Shield ===
    pub shield_radius: f32,
    pub shield_life: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            ball_size: BALL_SIZE,
            balls_number: BALLS_NUMBER,
            ball_radius_step: BALL_RADIUS_STEP,
            ball_angle_step: BALL_ANGLE_STEP_DEG.to_radians(),

            enemy_cap: ENEMY_CAP,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_speed: ENEMY_SPEED,
            enemy_bound_min: ENEMY_BOUND_MIN,
            enemy_bound_max: ENEMY_BOUND_MAX,
            enemy_lifetime: ENEMY_LIFETIME,

            beam_period: BEAM_PERIOD,
            beam_speed: BEAM_SPEED,
            beam_angle_deg: BEAM_ANGLE_DEG,
            beam_width: BEAM_WIDTH,
            beam_height: BEAM_HEIGHT,

            tank_start_x: TANK_START_X,
            tank_start_y: TANK_START_Y,
            tank_width: TANK_WIDTH,
            tank_height: TANK_HEIGHT,
            tank_step: TANK_STEP,

            obstacle_cap: OBSTACLE_CAP,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_y_min: OBSTACLE_Y_MIN,
            obstacle_y_max: OBSTACLE_Y_MAX,
            obstacle_interval_min: OBSTACLE_INTERVAL_MIN,
            obstacle_interval_max: OBSTACLE_INTERVAL_MAX,
            obstacle_durability: OBSTACLE_DURABILITY,
            obstacle_lifetime: None,

            shield_radius: SHIELD_RADIUS,
            shield_life: SHIELD_LIFE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// A tuning with every spawner switched off.
    ///
    /// Scenario tests start from this and place entities by hand.
    pub fn quiet() -> Self {
        Self {
            enemy_cap: 0,
            beam_period: 0,
            obstacle_cap: 0,
            ..Self::default()
        }
    }

    /// Clamp degenerate values so the simulation can run on any input.
    ///
    /// Inverted ranges are collapsed onto their lower end and non-positive
    /// dimensions fall back to the defaults. Speeds, steps and periods are
    /// left alone: zero is how a system gets switched off.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let sizes = [
            ("ball_size", &mut self.ball_size, defaults.ball_size),
            ("enemy_width", &mut self.enemy_width, defaults.enemy_width),
            ("enemy_height", &mut self.enemy_height, defaults.enemy_height),
            ("beam_width", &mut self.beam_width, defaults.beam_width),
            ("beam_height", &mut self.beam_height, defaults.beam_height),
            ("tank_width", &mut self.tank_width, defaults.tank_width),
            ("tank_height", &mut self.tank_height, defaults.tank_height),
            ("obstacle_width", &mut self.obstacle_width, defaults.obstacle_width),
            ("obstacle_height", &mut self.obstacle_height, defaults.obstacle_height),
            ("shield_radius", &mut self.shield_radius, defaults.shield_radius),
        ];
        for (name, value, default) in sizes {
            if !(*value > 0.0) {
                log::warn!("{} = {} is not positive, using {}", name, value, default);
                *value = default;
            }
        }

        if !(self.field_width > 0.0) || !(self.field_height > 0.0) {
            log::warn!(
                "Play-field {}x{} is degenerate, using {}x{}",
                self.field_width,
                self.field_height,
                defaults.field_width,
                defaults.field_height
            );
            self.field_width = defaults.field_width;
            self.field_height = defaults.field_height;
        }
        if self.enemy_bound_max < self.enemy_bound_min {
            log::warn!(
                "Enemy bound range {}..={} is inverted",
                self.enemy_bound_min,
                self.enemy_bound_max
            );
            self.enemy_bound_max = self.enemy_bound_min;
        }
        if self.obstacle_y_max < self.obstacle_y_min {
            log::warn!(
                "Obstacle y range {}..={} is inverted",
                self.obstacle_y_min,
                self.obstacle_y_max
            );
            self.obstacle_y_max = self.obstacle_y_min;
        }
        if self.obstacle_interval_max < self.obstacle_interval_min {
            log::warn!(
                "Obstacle interval {}..={} is inverted",
                self.obstacle_interval_min,
                self.obstacle_interval_max
            );
            self.obstacle_interval_max = self.obstacle_interval_min;
        }
        self
    }
}
