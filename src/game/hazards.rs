// Static hazards. Spikes hurt on touch and bounce an attacking player.

use glam::Vec2;

use super::damage::{DamageContext, Damageable, Hit};
use super::error::{non_negative, positive, TuningError};
use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};

/// Unique identifier for a hazard
pub type HazardId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct SpikeTuning {
    pub damage: i32,
    /// Bounce on a normal touch. Normalized on use.
    pub knockback_direction: Vec2,
    pub knockback_force: f32,
    /// Bounce when the player strikes the spike
    pub parry_direction: Vec2,
    pub parry_force: f32,
    pub width: f32,
    pub height: f32,
}

pub const BASE_SPIKE: SpikeTuning = SpikeTuning {
    damage: 1,
    knockback_direction: Vec2::Y,
    knockback_force: 5.0,
    parry_direction: Vec2::Y,
    parry_force: 7.0,
    width: 1.0,
    height: 0.5,
};

impl Default for SpikeTuning {
    fn default() -> Self {
        BASE_SPIKE
    }
}

impl SpikeTuning {
    pub fn knockback(&self) -> Vec2 {
        self.knockback_direction.normalize_or_zero() * self.knockback_force
    }

    pub fn parry(&self) -> Vec2 {
        self.parry_direction.normalize_or_zero() * self.parry_force
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        non_negative("spike.damage", self.damage as f32)?;
        non_negative("spike.knockback_force", self.knockback_force)?;
        non_negative("spike.parry_force", self.parry_force)?;
        positive("spike.width", self.width)?;
        positive("spike.height", self.height)?;
        Ok(())
    }
}

/// What touching a spike does to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpikeResponse {
    /// Player was attacking: bounce at this velocity, no damage
    Parry(Vec2),
    /// Plain touch
    Damage(Hit),
}

#[derive(Debug)]
pub struct Spike {
    id: HazardId,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    tuning: SpikeTuning,
    position: Vec2,
}

impl Spike {
    pub fn spawn(
        id: HazardId,
        tuning: SpikeTuning,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let body = physics.add_rigid_body(presets::ground_body(position.x, position.y));
        let collider = physics.add_collider(presets::hazard_collider(tuning.width, tuning.height), body);
        Ok(Self {
            id,
            body,
            collider,
            tuning,
            position,
        })
    }

    /// React to the player touching the spike
    pub fn respond(&self, player_attacking: bool, now: f32) -> SpikeResponse {
        if player_attacking {
            SpikeResponse::Parry(self.tuning.parry())
        } else {
            SpikeResponse::Damage(
                Hit::new(self.tuning.damage, Some(self.position), now)
                    .with_knockback(self.tuning.knockback()),
            )
        }
    }

    pub fn id(&self) -> HazardId {
        self.id
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn tuning(&self) -> &SpikeTuning {
        &self.tuning
    }
}

/// Spikes have no health; hits on them are dropped
impl Damageable for Spike {
    fn take_damage(&mut self, _hit: &Hit, _ctx: &mut DamageContext<'_>) {}
}
