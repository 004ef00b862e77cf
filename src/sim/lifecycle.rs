//! Spawning, timed resets, and destruction rules

use glam::Vec2;
use rand::Rng;

use super::rect::Field;
use super::registry::{Handle, Registry};
use super::state::{
    Beam, Enemy, EnemyPhase, GameEvent, GameState, Obstacle, Shield, SpiralBall, Tank,
};
use crate::firing_direction;
use crate::tuning::Tuning;

/// Uniform integer in `lo..=hi`; an inverted range yields `lo`
fn roll(rng: &mut impl Rng, lo: i32, hi: i32) -> i32 {
    if hi <= lo { lo } else { rng.random_range(lo..=hi) }
}

impl Beam {
    /// A beam leaving the tank's muzzle at the configured firing angle
    pub fn spawn(tank: &Tank, tuning: &Tuning) -> Self {
        Self {
            pos: tank.muzzle(),
            dir: firing_direction(tuning.beam_angle_deg),
            speed: tuning.beam_speed,
            size: Vec2::new(tuning.beam_width, tuning.beam_height),
        }
    }
}

impl Enemy {
    /// A fresh enemy at a random x along the top edge
    pub fn spawn(tuning: &Tuning, rng: &mut impl Rng, now: f64) -> Self {
        let mut enemy = Self {
            center: Vec2::ZERO,
            size: Vec2::new(tuning.enemy_width, tuning.enemy_height),
            vy: 0.0,
            bound: 0.0,
            phase: EnemyPhase::Descending,
            created_at: now,
            balls: Vec::new(),
        };
        enemy.rearm(tuning, rng, now);
        enemy
    }

    /// Re-randomize position and bound and start descending again
    fn rearm(&mut self, tuning: &Tuning, rng: &mut impl Rng, now: f64) {
        let x = roll(rng, 0, tuning.field_width as i32) as f32;
        let field = Field::new(tuning.field_width, tuning.field_height);
        self.center = field.clamp_point(Vec2::new(x, 0.0));
        self.bound = roll(rng, tuning.enemy_bound_min, tuning.enemy_bound_max) as f32;
        self.vy = tuning.enemy_speed;
        self.phase = EnemyPhase::Descending;
        self.created_at = now;
    }

    /// Descending and already past its bound
    pub fn should_hold(&self) -> bool {
        self.phase == EnemyPhase::Descending && self.center.y > self.bound
    }

    /// Stop and release a ring of balls around the current center.
    ///
    /// Returns the number of balls released.
    pub fn hold(&mut self, balls: &mut Registry<SpiralBall>, tuning: &Tuning) -> usize {
        self.vy = 0.0;
        self.phase = EnemyPhase::Holding;

        let count = tuning.balls_number;
        for i in 0..count {
            let offset = (i as f32 * (360.0 / count as f32)).to_radians();
            let handle = balls.insert(SpiralBall::spawn(self.center, offset, tuning.ball_size));
            self.balls.push(handle);
        }
        count
    }

    /// Strictly older than `lifetime` seconds
    pub fn is_expired(&self, now: f64, lifetime: f64) -> bool {
        now - self.created_at > lifetime
    }

    /// Back to the top: kill owned balls and re-randomize everything
    pub fn reset(
        &mut self,
        balls: &mut Registry<SpiralBall>,
        tuning: &Tuning,
        rng: &mut impl Rng,
        now: f64,
    ) {
        for handle in self.balls.drain(..) {
            balls.remove(handle);
        }
        self.rearm(tuning, rng, now);
    }
}

impl SpiralBall {
    /// A ball at radius zero whose box is centered on `origin`
    pub fn spawn(origin: Vec2, angle_offset: f32, size: f32) -> Self {
        Self {
            origin,
            radius: 0.0,
            angle: angle_offset,
            angle_offset,
            pos: origin - Vec2::splat(size),
            size,
        }
    }
}

impl Obstacle {
    pub fn spawn(tuning: &Tuning, rng: &mut impl Rng, now: f64) -> Self {
        let size = Vec2::new(tuning.obstacle_width, tuning.obstacle_height);
        let x = roll(rng, 0, (tuning.field_width - size.x) as i32) as f32;
        let y = roll(rng, tuning.obstacle_y_min, tuning.obstacle_y_max) as f32;
        let field = Field::new(tuning.field_width, tuning.field_height);
        Self {
            pos: field.clamp_origin(Vec2::new(x, y), size),
            size,
            durability: tuning.obstacle_durability,
            created_at: now,
        }
    }

    /// Take one hit; returns `true` when durability is used up
    pub fn hit(&mut self) -> bool {
        self.durability = self.durability.saturating_sub(1);
        self.durability == 0
    }

    pub fn is_expired(&self, now: f64, duration: f64) -> bool {
        now - self.created_at > duration
    }
}

impl Shield {
    pub fn raise(tank: &Tank, radius: f32, life: i32) -> Self {
        Self {
            center: tank.muzzle(),
            radius,
            life,
        }
    }

    /// Burn one update of life; returns `true` once the shield is spent
    pub fn wear(&mut self) -> bool {
        self.life -= 1;
        self.life < 0
    }
}

impl GameState {
    /// Pick the next obstacle spawn time, a whole number of seconds from now
    pub(crate) fn schedule_obstacle<R: Rng>(&mut self, rng: &mut R) {
        let secs = roll(
            rng,
            self.tuning.obstacle_interval_min as i32,
            self.tuning.obstacle_interval_max as i32,
        );
        self.next_obstacle_at = self.clock + f64::from(secs);
    }

    /// Add one enemy if below the cap
    pub fn spawn_enemy_if_needed<R: Rng>(&mut self, rng: &mut R) -> Option<Handle> {
        if self.enemies.len() >= self.tuning.enemy_cap {
            return None;
        }
        let enemy = Enemy::spawn(&self.tuning, rng, self.clock);
        let handle = self.enemies.insert(enemy);
        log::debug!("Enemy {:?} spawned at tick {}", handle, self.time_ticks);
        self.events.push(GameEvent::EnemySpawned { enemy: handle });
        Some(handle)
    }

    /// Auto-fire on every `beam_period`-th tick, starting with tick 0
    pub fn fire_beam_if_due(&mut self, frame: u64) -> Option<Handle> {
        let period = self.tuning.beam_period;
        if period == 0 || frame % period != 0 {
            return None;
        }
        let handle = self.beams.insert(Beam::spawn(&self.tank, &self.tuning));
        self.events.push(GameEvent::BeamFired { beam: handle });
        Some(handle)
    }

    /// Add one obstacle once the spawn timer has passed, if below the cap
    pub fn spawn_obstacle_if_due<R: Rng>(&mut self, rng: &mut R) -> Option<Handle> {
        if self.clock <= self.next_obstacle_at
            || self.obstacles.len() >= self.tuning.obstacle_cap
        {
            return None;
        }
        let obstacle = Obstacle::spawn(&self.tuning, rng, self.clock);
        let handle = self.obstacles.insert(obstacle);
        self.schedule_obstacle(rng);
        log::debug!(
            "Obstacle {:?} spawned, next no earlier than {:.2}s",
            handle,
            self.next_obstacle_at
        );
        self.events.push(GameEvent::ObstacleSpawned { obstacle: handle });
        Some(handle)
    }

    /// Remove obstacles older than the configured lifetime
    pub fn expire_obstacles(&mut self) {
        let Some(duration) = self.tuning.obstacle_lifetime else {
            return;
        };
        let now = self.clock;
        let expired: Vec<Handle> = self
            .obstacles
            .iter()
            .filter(|(_, o)| o.is_expired(now, duration))
            .map(|(h, _)| h)
            .collect();
        for handle in expired {
            self.obstacles.remove(handle);
            log::debug!("Obstacle {:?} expired", handle);
            self.events.push(GameEvent::ObstacleExpired { obstacle: handle });
        }
    }

    pub fn raise_shield(&mut self) -> Handle {
        let shield = Shield::raise(&self.tank, self.tuning.shield_radius, self.tuning.shield_life);
        let handle = self.shields.insert(shield);
        log::debug!("Shield {:?} raised", handle);
        self.events.push(GameEvent::ShieldRaised { shield: handle });
        handle
    }

    /// Age every shield by one update and drop the spent ones
    pub fn wear_shields(&mut self) {
        let mut spent = Vec::new();
        for (handle, shield) in self.shields.iter_mut() {
            if shield.wear() {
                spent.push(handle);
            }
        }
        for handle in spent {
            self.shields.remove(handle);
            log::debug!("Shield {:?} expired", handle);
            self.events.push(GameEvent::ShieldExpired { shield: handle });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn quiet_state() -> (GameState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(11);
        let state = GameState::new(Tuning::quiet(), &mut rng);
        (state, rng)
    }

    #[test]
    fn test_enemy_spawn_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..200 {
            let enemy = Enemy::spawn(&tuning, &mut rng, 0.0);
            assert!(enemy.bound >= 50.0 && enemy.bound <= 200.0);
            assert!(enemy.center.x >= 0.0 && enemy.center.x <= 600.0);
            assert_eq!(enemy.center.y, 0.0);
            assert_eq!(enemy.phase, EnemyPhase::Descending);
            assert_eq!(enemy.vy, 6.0);
        }
    }

    #[test]
    fn test_hold_releases_evenly_spaced_ring() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut balls = Registry::new();
        let mut enemy = Enemy::spawn(&tuning, &mut rng, 0.0);
        enemy.center = Vec2::new(300.0, 120.0);

        assert_eq!(enemy.hold(&mut balls, &tuning), 8);
        assert_eq!(enemy.phase, EnemyPhase::Holding);
        assert_eq!(enemy.vy, 0.0);
        assert_eq!(balls.len(), 8);
        assert_eq!(enemy.balls.len(), 8);

        let offsets: Vec<f32> = balls.iter().map(|(_, b)| b.angle_offset).collect();
        let step = std::f32::consts::TAU / 8.0;
        for (i, offset) in offsets.iter().enumerate() {
            assert!((offset - i as f32 * step).abs() < 1e-5);
        }
        for (_, ball) in balls.iter() {
            assert_eq!(ball.origin, enemy.center);
            assert_eq!(ball.radius, 0.0);
        }
    }

    #[test]
    fn test_reset_clears_balls_from_arena() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut balls = Registry::new();
        let mut enemy = Enemy::spawn(&tuning, &mut rng, 0.0);
        enemy.center.y = 250.0;
        enemy.hold(&mut balls, &tuning);

        enemy.reset(&mut balls, &tuning, &mut rng, 5.5);
        assert!(enemy.balls.is_empty());
        assert!(balls.is_empty());
        assert_eq!(enemy.phase, EnemyPhase::Descending);
        assert_eq!(enemy.center.y, 0.0);
        assert_eq!(enemy.created_at, 5.5);
    }

    #[test]
    fn test_obstacle_durability() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut obstacle = Obstacle::spawn(&Tuning::default(), &mut rng, 0.0);
        for _ in 0..19 {
            assert!(!obstacle.hit());
        }
        assert_eq!(obstacle.durability, 1);
        assert!(obstacle.hit());
        assert_eq!(obstacle.durability, 0);
        // Further hits stay at zero
        assert!(obstacle.hit());
        assert_eq!(obstacle.durability, 0);
    }

    #[test]
    fn test_obstacle_spawn_area() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..200 {
            let o = Obstacle::spawn(&tuning, &mut rng, 0.0);
            assert!(o.pos.x >= 0.0 && o.pos.x <= 500.0);
            assert!(o.pos.y >= 200.0 && o.pos.y <= 400.0);
        }
    }

    #[test]
    fn test_obstacle_spawn_clamped_on_tiny_field() {
        let tuning = Tuning {
            field_width: 50.0,
            field_height: 50.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(4);
        let o = Obstacle::spawn(&tuning, &mut rng, 0.0);
        assert_eq!(o.pos.x, 0.0);
        assert_eq!(o.pos.y, 30.0);
    }

    #[test]
    fn test_beam_period() {
        let (mut state, _) = quiet_state();
        state.tuning.beam_period = 12;
        let fired: Vec<u64> = (0..40)
            .filter(|&f| state.fire_beam_if_due(f).is_some())
            .collect();
        assert_eq!(fired, vec![0, 12, 24, 36]);
        assert_eq!(state.beams.len(), 4);
    }

    #[test]
    fn test_zero_beam_period_disables_fire() {
        let (mut state, _) = quiet_state();
        assert!(state.fire_beam_if_due(0).is_none());
    }

    #[test]
    fn test_enemy_cap() {
        let (mut state, mut rng) = quiet_state();
        state.tuning.enemy_cap = 2;
        assert!(state.spawn_enemy_if_needed(&mut rng).is_some());
        assert!(state.spawn_enemy_if_needed(&mut rng).is_some());
        assert!(state.spawn_enemy_if_needed(&mut rng).is_none());
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_obstacle_timer_and_cap() {
        let (mut state, mut rng) = quiet_state();
        state.tuning.obstacle_cap = 1;
        state.next_obstacle_at = 2.0;

        state.clock = 2.0;
        assert!(state.spawn_obstacle_if_due(&mut rng).is_none());

        state.clock = 2.01;
        assert!(state.spawn_obstacle_if_due(&mut rng).is_some());
        let wait = state.next_obstacle_at - state.clock;
        assert!((1.0..=3.0).contains(&wait));

        state.clock = 100.0;
        assert!(state.spawn_obstacle_if_due(&mut rng).is_none());
    }

    #[test]
    fn test_obstacle_expiry_needs_lifetime() {
        let (mut state, mut rng) = quiet_state();
        let handle = state.obstacles.insert(Obstacle::spawn(&state.tuning, &mut rng, 0.0));
        state.clock = 1000.0;
        state.expire_obstacles();
        assert!(state.obstacles.is_alive(handle));

        state.tuning.obstacle_lifetime = Some(10.0);
        state.clock = 10.0;
        state.expire_obstacles();
        assert!(state.obstacles.is_alive(handle));

        state.clock = 10.5;
        state.expire_obstacles();
        assert!(!state.obstacles.is_alive(handle));
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::ObstacleExpired { obstacle: handle })
        );
    }

    #[test]
    fn test_shield_wears_out() {
        let (mut state, _) = quiet_state();
        state.tuning.shield_life = 2;
        let handle = state.raise_shield();
        state.wear_shields(); // 1
        state.wear_shields(); // 0
        assert!(state.shields.is_alive(handle));
        assert_eq!(state.shields.get(handle).map(|s| s.life), Some(0));
        state.wear_shields(); // -1
        assert!(!state.shields.is_alive(handle));
    }
}
