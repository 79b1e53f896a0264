// The damage contract every attacker uses on every receiver

use glam::Vec2;

use super::enemies::EnemyId;
use super::events::SimEvent;
use super::hazards::HazardId;
use crate::engine::physics::PhysicsWorld;

/// One damage application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub amount: i32,
    /// Where the attacker stood, if known. Receivers knock themselves away from it.
    pub source: Option<Vec2>,
    /// Velocity the attacker imposes, applied only if the hit lands
    pub knockback: Option<Vec2>,
    /// Simulation time of the hit
    pub at: f32,
}

impl Hit {
    pub fn new(amount: i32, source: Option<Vec2>, at: f32) -> Self {
        Self {
            amount,
            source,
            knockback: None,
            at,
        }
    }

    pub fn with_knockback(mut self, velocity: Vec2) -> Self {
        self.knockback = Some(velocity);
        self
    }
}

/// What a receiver may touch while reacting to a hit
pub struct DamageContext<'a> {
    pub physics: &'a mut PhysicsWorld,
    pub events: &'a mut Vec<SimEvent>,
}

/// Anything that can be hurt. Not idempotent: every call is a new hit.
pub trait Damageable {
    fn take_damage(&mut self, hit: &Hit, ctx: &mut DamageContext<'_>);
}

/// The closed set of things that can receive damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    Player,
    Enemy(EnemyId),
    Hazard(HazardId),
}
