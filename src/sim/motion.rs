//! Per-kind motion models
//!
//! Each update moves an entity by exactly one tick. None of them look at
//! other entities; spawning and removal live in `lifecycle`.

use glam::Vec2;

use super::state::{Beam, Enemy, EnemyPhase, Shield, SpiralBall, Tank};
use crate::polar_to_cartesian;

impl Beam {
    /// Straight-line flight along the firing direction
    pub fn advance(&mut self) {
        self.pos += self.dir * self.speed;
    }
}

impl Enemy {
    /// Descend while `Descending`; a holding enemy has `vy == 0`
    pub fn advance(&mut self) {
        if self.phase == EnemyPhase::Descending {
            self.center.y += self.vy;
        }
    }
}

impl SpiralBall {
    /// Grow radius and angle, then place the ball from scratch.
    ///
    /// Position is always `origin + radius * (cos angle, sin angle)`, so drift
    /// can only build up in `radius` and `angle` themselves.
    pub fn advance(&mut self, radius_step: f32, angle_step: f32) {
        self.radius += radius_step;
        self.angle += angle_step;
        self.pos = self.origin + polar_to_cartesian(self.radius, self.angle);
    }

    /// Where the spiral path currently is, ignoring the box anchor
    pub fn path_point(&self) -> Vec2 {
        self.origin + polar_to_cartesian(self.radius, self.angle)
    }
}

impl Shield {
    /// Snap onto the tank
    pub fn track(&mut self, tank: &Tank) {
        self.center = tank.muzzle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firing_direction;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn beam_at(pos: Vec2, angle_deg: f32) -> Beam {
        Beam {
            pos,
            dir: firing_direction(angle_deg),
            speed: 10.0,
            size: Vec2::new(8.0, 32.0),
        }
    }

    #[test]
    fn test_vertical_beam_has_no_drift() {
        let start = Vec2::new(325.0, 500.0);
        let mut beam = beam_at(start, 90.0);
        for _ in 0..30 {
            beam.advance();
        }
        assert_eq!(beam.pos.x, start.x);
        assert_eq!(beam.pos.y, start.y - 30.0 * 10.0);
    }

    #[test]
    fn test_beam_at_left_edge_stays_on_edge() {
        let mut beam = beam_at(Vec2::new(0.0, 500.0), 90.0);
        for _ in 0..10 {
            beam.advance();
        }
        assert_eq!(beam.pos, Vec2::new(0.0, 400.0));
    }

    #[test]
    fn test_enemy_holds_still() {
        let mut enemy = Enemy {
            center: Vec2::new(100.0, 40.0),
            size: Vec2::splat(48.0),
            vy: 6.0,
            bound: 50.0,
            phase: EnemyPhase::Descending,
            created_at: 0.0,
            balls: Vec::new(),
        };
        enemy.advance();
        assert_eq!(enemy.center.y, 46.0);

        enemy.phase = EnemyPhase::Holding;
        enemy.vy = 0.0;
        enemy.advance();
        assert_eq!(enemy.center.y, 46.0);
    }

    #[test]
    fn test_spiral_position_from_parameters() {
        let tuning = Tuning::default();
        let origin = Vec2::new(200.0, 150.0);
        let mut ball = SpiralBall {
            origin,
            radius: 0.0,
            angle: 0.0,
            angle_offset: 0.0,
            pos: origin,
            size: tuning.ball_size,
        };
        for _ in 0..90 {
            ball.advance(tuning.ball_radius_step, tuning.ball_angle_step);
        }
        assert!((ball.radius - 90.0).abs() < 1e-3);
        assert!((ball.angle - std::f32::consts::PI).abs() < 1e-3);
        // Half a turn later the ball sits to the left of its origin
        assert!((ball.pos - Vec2::new(110.0, 150.0)).length() < 0.1);
        assert_eq!(ball.pos, ball.path_point());
    }

    #[test]
    fn test_shield_tracks_tank() {
        let mut tank = Tank::new(&Tuning::default());
        let mut shield = Shield {
            center: Vec2::ZERO,
            radius: 100.0,
            life: 10,
        };
        tank.move_left(40.0, 0.0);
        shield.track(&tank);
        assert_eq!(shield.center, Vec2::new(260.0 + 25.0, 500.0));
    }

    proptest! {
        #[test]
        fn beam_step_matches_angle(angle in 0.0f32..180.0, x in 0.0f32..600.0, y in 0.0f32..600.0) {
            let mut beam = beam_at(Vec2::new(x, y), angle);
            beam.advance();
            let theta = angle.to_radians();
            prop_assert!((beam.pos.y - (y - 10.0 * theta.sin())).abs() < 1e-3);
            prop_assert!((beam.pos.x - (x + 10.0 * theta.cos())).abs() < 1e-3);
        }

        #[test]
        fn spiral_radius_only_grows(steps in 1usize..200) {
            let mut ball = SpiralBall {
                origin: Vec2::ZERO,
                radius: 0.0,
                angle: 0.0,
                angle_offset: 0.0,
                pos: Vec2::ZERO,
                size: 15.0,
            };
            let mut last = (ball.radius, ball.angle);
            for _ in 0..steps {
                ball.advance(1.0, 0.05);
                prop_assert!(ball.radius > last.0 && ball.angle > last.1);
                last = (ball.radius, ball.angle);
            }
        }
    }
}
