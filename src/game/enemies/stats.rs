// Enemy tuning

use glam::Vec2;

use crate::game::error::{non_negative, positive, TuningError};

/// B point used when no radius is configured
const DEFAULT_POINT_SPACING: f32 = 2.0;

/// How the patrol endpoints are chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolMode {
    /// Two explicit points. A missing A means the spawn point; a missing B
    /// means `spawn + right * patrol_radius` (or 2 units without a radius).
    Points { a: Option<Vec2>, b: Option<Vec2> },
    /// Back and forth between `spawn ± patrol_radius` on x
    Radius,
}

impl PatrolMode {
    /// (left/A, right/B) endpoints for an enemy spawned at `spawn`
    pub fn endpoints(&self, spawn: Vec2, radius: f32) -> (Vec2, Vec2) {
        match *self {
            Self::Points { a, b } => {
                let spacing = if radius > 0.0 {
                    radius
                } else {
                    DEFAULT_POINT_SPACING
                };
                (
                    a.unwrap_or(spawn),
                    b.unwrap_or(spawn + Vec2::X * spacing),
                )
            }
            Self::Radius => (spawn - Vec2::X * radius, spawn + Vec2::X * radius),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTuning {
    pub patrol: PatrolMode,
    pub patrol_radius: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Start chasing when the player comes this close to the enemy
    pub detect_radius: f32,
    /// Stop chasing when the player is this far from the spawn point
    pub lose_interest_distance: f32,
    pub max_health: i32,
    pub contact_damage: i32,
    /// Speed the enemy is knocked back at when hit
    pub hit_knockback_force: f32,
    /// Speed the player is pushed away at on contact
    pub contact_knockback_force: f32,
    /// Total length of the darken + fade part of the death sequence
    pub death_destroy_delay: f32,
    /// How close counts as having reached a patrol endpoint
    pub reach_eps: f32,
    pub width: f32,
    pub height: f32,
}

pub const BASE_ENEMY: EnemyTuning = EnemyTuning {
    patrol: PatrolMode::Radius,
    patrol_radius: 3.0,
    patrol_speed: 1.5,
    chase_speed: 3.0,
    detect_radius: 4.0,
    lose_interest_distance: 8.0,
    max_health: 3,
    contact_damage: 1,
    hit_knockback_force: 4.0,
    contact_knockback_force: 5.0,
    death_destroy_delay: 1.5,
    reach_eps: 0.05,
    width: 1.0,
    height: 1.0,
};

impl Default for EnemyTuning {
    fn default() -> Self {
        BASE_ENEMY
    }
}

impl EnemyTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        non_negative("patrol_radius", self.patrol_radius)?;
        non_negative("patrol_speed", self.patrol_speed)?;
        non_negative("chase_speed", self.chase_speed)?;
        non_negative("detect_radius", self.detect_radius)?;
        if !(self.lose_interest_distance >= self.detect_radius) {
            return Err(TuningError::OutOfOrder {
                lower: "detect_radius",
                lower_value: self.detect_radius,
                upper: "lose_interest_distance",
                upper_value: self.lose_interest_distance,
            });
        }
        non_negative("contact_damage", self.contact_damage as f32)?;
        non_negative("hit_knockback_force", self.hit_knockback_force)?;
        non_negative("contact_knockback_force", self.contact_knockback_force)?;
        non_negative("death_destroy_delay", self.death_destroy_delay)?;
        positive("reach_eps", self.reach_eps)?;
        positive("width", self.width)?;
        positive("height", self.height)?;
        Ok(())
    }
}
