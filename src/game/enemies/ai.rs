// Patrol/chase brain. Pure: positions in, horizontal velocity out.

use glam::Vec2;

use super::stats::EnemyTuning;
use super::EnemyMode;
use crate::core::math::sign_outside;

/// Steering input needed before the enemy turns around
const FACING_DEADZONE: f32 = 0.05;

/// Result of one brain update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Horizontal velocity to write. Vertical velocity stays with physics.
    pub velocity_x: f32,
    /// Set on the tick the mode flipped
    pub mode_changed: Option<EnemyMode>,
}

#[derive(Debug, Clone)]
pub struct EnemyBrain {
    mode: EnemyMode,
    spawn: Vec2,
    left: Vec2,
    right: Vec2,
    target: Vec2,
    facing: f32,
    patrol_speed: f32,
    chase_speed: f32,
    detect_radius: f32,
    lose_interest_distance: f32,
    reach_eps: f32,
}

impl EnemyBrain {
    /// Starts patrolling toward the right/B endpoint
    pub fn new(spawn: Vec2, tuning: &EnemyTuning) -> Self {
        let (left, right) = tuning.patrol.endpoints(spawn, tuning.patrol_radius);
        Self {
            mode: EnemyMode::Patrol,
            spawn,
            left,
            right,
            target: right,
            facing: 1.0,
            patrol_speed: tuning.patrol_speed,
            chase_speed: tuning.chase_speed,
            detect_radius: tuning.detect_radius,
            lose_interest_distance: tuning.lose_interest_distance,
            reach_eps: tuning.reach_eps,
        }
    }

    /// Update the mode from the player's position, then steer.
    /// With no player the mode is left alone and the enemy patrols.
    pub fn update(&mut self, position: Vec2, player: Option<Vec2>) -> Steering {
        let mode_changed = player.and_then(|player| self.transition(position, player));

        let steering = match (self.mode, player) {
            (EnemyMode::Chase, Some(player)) => {
                let dir = (player - position).normalize_or_zero();
                Steering {
                    velocity_x: dir.x * self.chase_speed,
                    mode_changed,
                }
            }
            _ => Steering {
                velocity_x: self.patrol(position) * self.patrol_speed,
                mode_changed,
            },
        };

        if let Some(sign) = sign_outside(steering.velocity_x, FACING_DEADZONE) {
            self.facing = sign;
        }
        steering
    }

    /// Enter chase near the enemy; leave it only when the player strays
    /// from the spawn point
    fn transition(&mut self, position: Vec2, player: Vec2) -> Option<EnemyMode> {
        let next = match self.mode {
            EnemyMode::Patrol if player.distance(position) <= self.detect_radius => {
                EnemyMode::Chase
            }
            EnemyMode::Chase if player.distance(self.spawn) > self.lose_interest_distance => {
                EnemyMode::Patrol
            }
            _ => return None,
        };
        self.mode = next;
        Some(next)
    }

    /// Horizontal direction toward the patrol target, swapping endpoints on arrival
    fn patrol(&mut self, position: Vec2) -> f32 {
        if (self.target.x - position.x).abs() <= self.reach_eps {
            self.target = if self.target == self.left {
                self.right
            } else {
                self.left
            };
        }
        let dx = self.target.x - position.x;
        if dx.abs() <= self.reach_eps {
            // Both endpoints at the same spot
            0.0
        } else {
            dx.signum()
        }
    }

    pub fn mode(&self) -> EnemyMode {
        self.mode
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn endpoints(&self) -> (Vec2, Vec2) {
        (self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::FIXED_TIMESTEP;
    use crate::game::enemies::PatrolMode;
    use approx::assert_abs_diff_eq;

    fn brain() -> EnemyBrain {
        EnemyBrain::new(Vec2::ZERO, &EnemyTuning::default())
    }

    #[test]
    fn test_patrol_oscillates_between_radius_endpoints() {
        let mut brain = brain();
        let mut x = 0.0;
        let mut last_dir = 1.0;
        let mut turns = Vec::new();

        for _ in 0..1_500 {
            let steer = brain.update(Vec2::new(x, 0.0), None);
            assert!(steer.velocity_x.abs() == 1.5 || steer.velocity_x == 0.0);
            let dir = steer.velocity_x.signum();
            if dir != last_dir {
                turns.push(x);
                last_dir = dir;
            }
            x += steer.velocity_x * FIXED_TIMESTEP;
            assert!(x.abs() <= 3.0 + 0.05 + 1e-3);
        }

        // 25s at 1.5 u/s over a 6 unit span: several reversals, each at an end
        assert!(turns.len() >= 5);
        for (i, turn) in turns.iter().enumerate() {
            let end = if i % 2 == 0 { 3.0 } else { -3.0 };
            assert_abs_diff_eq!(*turn, end, epsilon = 0.05 + 1e-4);
        }
        assert_eq!(brain.mode(), EnemyMode::Patrol);
    }

    #[test]
    fn test_swap_only_within_reach_eps() {
        let mut brain = brain();
        brain.update(Vec2::new(2.9, 0.0), None);
        assert_eq!(brain.target(), Vec2::new(3.0, 0.0));

        let steer = brain.update(Vec2::new(2.96, 0.0), None);
        assert_eq!(brain.target(), Vec2::new(-3.0, 0.0));
        // Heads for the new target on the same tick
        assert_eq!(steer.velocity_x, -1.5);
    }

    #[test]
    fn test_detection_starts_chase() {
        let mut brain = brain();
        let steer = brain.update(Vec2::ZERO, Some(Vec2::new(-3.0, 0.0)));
        assert_eq!(steer.mode_changed, Some(EnemyMode::Chase));
        assert_eq!(steer.velocity_x, -3.0);
        assert_eq!(brain.facing(), -1.0);

        // Already chasing: no further change reported
        let steer = brain.update(Vec2::ZERO, Some(Vec2::new(-3.0, 0.0)));
        assert_eq!(steer.mode_changed, None);
    }

    #[test]
    fn test_chase_moves_directly_toward_player() {
        let mut brain = brain();
        let steer = brain.update(Vec2::ZERO, Some(Vec2::new(1.5, 2.0)));
        assert_eq!(brain.mode(), EnemyMode::Chase);
        // Normalized (0.6, 0.8) * 3
        assert_abs_diff_eq!(steer.velocity_x, 1.8, epsilon = 1e-5);
    }

    #[test]
    fn test_exit_is_anchored_to_spawn() {
        let mut brain = brain();
        brain.update(Vec2::ZERO, Some(Vec2::new(2.0, 0.0)));
        assert_eq!(brain.mode(), EnemyMode::Chase);

        // Enemy chased far to the right: player is 10 from the enemy but
        // only 7 from spawn, so the chase continues
        let enemy = Vec2::new(17.0, 0.0);
        let steer = brain.update(enemy, Some(Vec2::new(7.0, 0.0)));
        assert_eq!(steer.mode_changed, None);
        assert_eq!(brain.mode(), EnemyMode::Chase);

        // Player 8.5 from spawn
        let steer = brain.update(Vec2::new(1.0, 0.0), Some(Vec2::new(8.5, 0.0)));
        assert_eq!(steer.mode_changed, Some(EnemyMode::Patrol));
        assert_eq!(brain.mode(), EnemyMode::Patrol);
    }

    #[test]
    fn test_no_oscillation_at_detection_edge() {
        let mut brain = brain();
        let mut changes = 0;
        // Player hovers around the detection radius
        for i in 0..200 {
            let wobble = if i % 2 == 0 { 3.95 } else { 4.05 };
            let steer = brain.update(Vec2::ZERO, Some(Vec2::new(wobble, 0.0)));
            if steer.mode_changed.is_some() {
                changes += 1;
            }
        }
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_point_mode_uses_same_swap_rule() {
        let tuning = EnemyTuning {
            patrol: PatrolMode::Points {
                a: Some(Vec2::new(-1.0, 0.0)),
                b: None,
            },
            ..EnemyTuning::default()
        };
        let mut brain = EnemyBrain::new(Vec2::ZERO, &tuning);
        assert_eq!(brain.endpoints(), (Vec2::new(-1.0, 0.0), Vec2::new(3.0, 0.0)));

        let steer = brain.update(Vec2::new(3.0, 0.0), None);
        assert_eq!(brain.target(), Vec2::new(-1.0, 0.0));
        assert_eq!(steer.velocity_x, -1.5);
        let steer = brain.update(Vec2::new(-0.98, 0.0), None);
        assert_eq!(brain.target(), Vec2::new(3.0, 0.0));
        assert_eq!(steer.velocity_x, 1.5);
    }

    #[test]
    fn test_missing_player_keeps_patrolling() {
        let mut brain = brain();
        let steer = brain.update(Vec2::ZERO, None);
        assert_eq!(steer.mode_changed, None);
        assert_eq!(steer.velocity_x, 1.5);
    }
}
