//! Game state and core simulation types
//!
//! Everything the renderer draws and the step mutates lives here.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Body;
use super::rect::{Field, Rect};
use super::registry::{Handle, Registry};
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// A ball reached the tank; terminal for this run
    GameOver,
}

/// The player's tank (anchored at its top-left corner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Tank {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.tank_start_x, tuning.tank_start_y),
            size: Vec2::new(tuning.tank_width, tuning.tank_height),
        }
    }

    /// Horizontal center of the top edge. Beams leave from here and
    /// shields are centered on it.
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    pub fn move_left(&mut self, distance: f32, min_x: f32) {
        self.pos.x = (self.pos.x - distance).max(min_x);
    }

    pub fn move_right(&mut self, distance: f32, max_x: f32) {
        self.pos.x = (self.pos.x + distance).min(max_x - self.size.x);
    }
}

impl Body for Tank {
    fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

/// A beam fired by the tank (anchored at its center)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beam {
    pub pos: Vec2,
    /// Unit direction, fixed at spawn
    pub dir: Vec2,
    pub speed: f32,
    pub size: Vec2,
}

impl Body for Beam {
    fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// Enemy movement phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    Descending,
    /// Parked at its bound after releasing its balls
    Holding,
}

/// A descending invader (anchored at its center)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub center: Vec2,
    pub size: Vec2,
    /// Downward speed per tick (zero while holding)
    pub vy: f32,
    /// Altitude at which the enemy stops and releases its balls
    pub bound: f32,
    pub phase: EnemyPhase,
    /// Logical clock value at spawn or last reset
    pub created_at: f64,
    /// Balls this enemy released, as handles into the ball arena
    pub balls: Vec<Handle>,
}

impl Body for Enemy {
    fn rect(&self) -> Rect {
        Rect::from_center(self.center, self.size)
    }
}

/// A projectile spiraling out from the point its enemy released it.
///
/// `pos` is the top-left corner of the ball's box; before the first update
/// the box is centered on `origin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiralBall {
    pub origin: Vec2,
    pub radius: f32,
    /// Current angle (radians)
    pub angle: f32,
    /// Angle the ball started at (radians)
    pub angle_offset: f32,
    pub pos: Vec2,
    /// Ball radius; the box is `2 * size` square
    pub size: f32,
}

impl Body for SpiralBall {
    fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size * 2.0, self.size * 2.0)
    }
}

/// Destructible cover (anchored at its top-left corner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub durability: u32,
    pub created_at: f64,
}

impl Body for Obstacle {
    fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

/// A temporary barrier that follows the tank.
///
/// There is only ever one tank, so the shield's binding to it is implicit:
/// the step re-anchors every shield on `GameState::tank` each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub center: Vec2,
    pub radius: f32,
    /// Updates left; the shield is removed once this drops below zero
    pub life: i32,
}

impl Body for Shield {
    fn rect(&self) -> Rect {
        Rect::from_center(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// Gameplay events emitted during a tick (for audio/UI collaborators)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { enemy: Handle },
    /// An enemy reached its bound and released balls
    BallsReleased { enemy: Handle, count: usize },
    /// An enemy outlived its lifetime and went back to the top
    EnemyReset { enemy: Handle },
    /// A beam destroyed an enemy
    EnemyDestroyed { enemy: Handle },
    BeamFired { beam: Handle },
    /// A shield absorbed a ball
    BallDeflected { ball: Handle },
    /// A beam destroyed a ball
    BallShot { ball: Handle },
    ObstacleSpawned { obstacle: Handle },
    ObstacleHit { obstacle: Handle, durability: u32 },
    ObstacleDestroyed { obstacle: Handle },
    ObstacleExpired { obstacle: Handle },
    ShieldRaised { shield: Handle },
    ShieldExpired { shield: Handle },
    /// A ball reached the tank; the run is over
    TankHit { ball: Handle },
}

/// Visual category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Tank,
    Beam,
    Enemy,
    SpiralBall,
    Obstacle,
    Shield,
}

/// Borrowed view of any live entity
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Tank(&'a Tank),
    Beam(&'a Beam),
    Enemy(&'a Enemy),
    SpiralBall(&'a SpiralBall),
    Obstacle(&'a Obstacle),
    Shield(&'a Shield),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Tank(_) => EntityKind::Tank,
            EntityRef::Beam(_) => EntityKind::Beam,
            EntityRef::Enemy(_) => EntityKind::Enemy,
            EntityRef::SpiralBall(_) => EntityKind::SpiralBall,
            EntityRef::Obstacle(_) => EntityKind::Obstacle,
            EntityRef::Shield(_) => EntityKind::Shield,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            EntityRef::Tank(t) => t.rect(),
            EntityRef::Beam(b) => b.rect(),
            EntityRef::Enemy(e) => e.rect(),
            EntityRef::SpiralBall(b) => b.rect(),
            EntityRef::Obstacle(o) => o.rect(),
            EntityRef::Shield(s) => s.rect(),
        }
    }
}

/// Owned, serializable draw record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: EntityKind,
    pub rect: Rect,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub field: Field,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Logical clock (seconds since the run started)
    pub clock: f64,
    /// Clock value after which the next obstacle may spawn
    pub next_obstacle_at: f64,
    pub tank: Tank,
    pub beams: Registry<Beam>,
    pub enemies: Registry<Enemy>,
    /// Ball arena; enemies refer into it by handle
    pub balls: Registry<SpiralBall>,
    pub obstacles: Registry<Obstacle>,
    pub shields: Registry<Shield>,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run. The RNG schedules the first obstacle.
    pub fn new<R: Rng>(tuning: Tuning, rng: &mut R) -> Self {
        let tuning = tuning.sanitized();
        let mut state = Self {
            field: Field::new(tuning.field_width, tuning.field_height),
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            clock: 0.0,
            next_obstacle_at: 0.0,
            tank: Tank::new(&tuning),
            beams: Registry::new(),
            enemies: Registry::new(),
            balls: Registry::new(),
            obstacles: Registry::new(),
            shields: Registry::new(),
            events: Vec::new(),
            tuning,
        };
        state.schedule_obstacle(rng);
        log::info!(
            "New run: field {}x{}, tank at ({}, {})",
            state.field.width,
            state.field.height,
            state.tank.pos.x,
            state.tank.pos.y
        );
        state
    }

    /// Throw away the current run and start over with the same tuning
    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        log::info!("Restarting after tick {} with score {}", self.time_ticks, self.score);
        *self = Self::new(self.tuning.clone(), rng);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score_up(&mut self, add: u64) {
        self.score += add;
    }

    /// Live entities in draw order (back to front)
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.obstacles
            .iter()
            .map(|(_, o)| EntityRef::Obstacle(o))
            .chain(std::iter::once(EntityRef::Tank(&self.tank)))
            .chain(self.balls.iter().map(|(_, b)| EntityRef::SpiralBall(b)))
            .chain(self.beams.iter().map(|(_, b)| EntityRef::Beam(b)))
            .chain(self.enemies.iter().map(|(_, e)| EntityRef::Enemy(e)))
            .chain(self.shields.iter().map(|(_, s)| EntityRef::Shield(s)))
    }

    /// Owned copy of [`GameState::entities`] for handing to a renderer
    pub fn snapshot(&self) -> Vec<Sprite> {
        self.entities()
            .map(|e| Sprite {
                kind: e.kind(),
                rect: e.rect(),
            })
            .collect()
    }

    /// Drop dead entities and forget handles to purged balls
    pub fn prune(&mut self) {
        self.beams.purge();
        self.enemies.purge();
        self.obstacles.purge();
        self.shields.purge();
        self.balls.purge();

        let balls = &self.balls;
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.balls.retain(|h| balls.is_alive(*h));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_state() {
        let mut rng = Pcg32::seed_from_u64(7);
        let state = GameState::new(Tuning::default(), &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.tank.pos, Vec2::new(300.0, 500.0));
        assert!(state.next_obstacle_at >= 1.0 && state.next_obstacle_at <= 3.0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_tank_moves_are_clamped() {
        let mut tank = Tank::new(&Tuning::default());
        tank.pos.x = 5.0;
        tank.move_left(10.0, 0.0);
        assert_eq!(tank.pos.x, 0.0);

        tank.pos.x = 545.0;
        tank.move_right(10.0, 600.0);
        assert_eq!(tank.pos.x, 550.0);
    }

    #[test]
    fn test_snapshot_draw_order() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::new(Tuning::quiet(), &mut rng);
        state.shields.insert(Shield {
            center: Vec2::ZERO,
            radius: 10.0,
            life: 3,
        });
        state.obstacles.insert(Obstacle {
            pos: Vec2::new(10.0, 10.0),
            size: Vec2::new(100.0, 20.0),
            durability: 20,
            created_at: 0.0,
        });

        let kinds: Vec<_> = state.snapshot().into_iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Obstacle, EntityKind::Tank, EntityKind::Shield]
        );
    }

    #[test]
    fn test_prune_forgets_dead_ball_handles() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut state = GameState::new(Tuning::quiet(), &mut rng);
        let ball = |x: f32| SpiralBall {
            origin: Vec2::new(x, 0.0),
            radius: 0.0,
            angle: 0.0,
            angle_offset: 0.0,
            pos: Vec2::new(x, 0.0),
            size: 15.0,
        };
        let keep = state.balls.insert(ball(0.0));
        let gone = state.balls.insert(ball(100.0));
        state.enemies.insert(Enemy {
            center: Vec2::ZERO,
            size: Vec2::splat(48.0),
            vy: 0.0,
            bound: 100.0,
            phase: EnemyPhase::Holding,
            created_at: 0.0,
            balls: vec![keep, gone],
        });

        state.balls.remove(gone);
        state.prune();

        let (_, enemy) = state.enemies.iter().next().unwrap();
        assert_eq!(enemy.balls, vec![keep]);
    }

    #[test]
    fn test_restart_resets_score() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = GameState::new(Tuning::default(), &mut rng);
        state.score_up(4);
        state.phase = GamePhase::GameOver;
        state.restart(&mut rng);
        assert_eq!(state.score, 0);
        assert!(!state.is_game_over());
        assert_eq!(state.tuning, Tuning::default());
    }
}
