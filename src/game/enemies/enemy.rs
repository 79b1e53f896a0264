// Enemy entity: physics handles, brain, health and death sequence

use glam::Vec2;
use rapier2d::prelude::{vector, RigidBodyType};

use super::ai::EnemyBrain;
use super::death::{DeathPhase, DeathSequence};
use super::stats::EnemyTuning;
use super::{EnemyId, EnemyMode};
use crate::core::math::{direction_or, to_vec2, to_vector};
use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::damage::{DamageContext, Damageable, Hit};
use crate::game::error::TuningError;
use crate::game::events::SimEvent;
use crate::game::health::{DamageOutcome, HealthPool};

/// Upward bias added to the hitbox nudge so enemies don't wedge into walls
const NUDGE_LIFT: f32 = 0.3;

/// Read-only snapshot for presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyView {
    pub id: EnemyId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mode: EnemyMode,
    pub facing: f32,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub death_phase: Option<DeathPhase>,
    pub brightness: f32,
    pub alpha: f32,
}

#[derive(Debug)]
pub struct Enemy {
    id: EnemyId,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    tuning: EnemyTuning,
    brain: EnemyBrain,
    health: HealthPool,
    /// Set once, on the killing blow
    death: Option<DeathSequence>,
}

impl Enemy {
    pub fn spawn(
        id: EnemyId,
        tuning: EnemyTuning,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;

        let body = physics.add_rigid_body(presets::enemy_body(position.x, position.y));
        let collider = physics.add_collider(presets::enemy_collider(tuning.width, tuning.height), body);

        let mut health = HealthPool::without_invulnerability(tuning.max_health);
        // Nobody observes enemy health
        health.drain_changes();

        log::debug!("Enemy {} spawned at ({:.2}, {:.2})", id, position.x, position.y);

        Ok(Self {
            id,
            body,
            collider,
            brain: EnemyBrain::new(position, &tuning),
            tuning,
            health,
            death: None,
        })
    }

    /// Update the brain and write horizontal velocity. `player` is the
    /// player's position, if there is a live player to react to.
    pub fn steer(&mut self, physics: &mut PhysicsWorld, player: Option<Vec2>, events: &mut Vec<SimEvent>) {
        if self.death.is_some() {
            return;
        }
        let Some(body) = physics.get_rigid_body_mut(self.body) else {
            return;
        };

        let position = to_vec2(body.translation());
        let steering = self.brain.update(position, player);
        let vy = body.linvel().y;
        body.set_linvel(vector![steering.velocity_x, vy], true);

        if let Some(mode) = steering.mode_changed {
            log::debug!("Enemy {} -> {:?}", self.id, mode);
            events.push(SimEvent::EnemyModeChanged {
                enemy: self.id,
                mode,
            });
        }
    }

    /// The hit this enemy deals on touching the player at `player`
    pub fn contact_hit(&self, physics: &PhysicsWorld, player: Vec2, now: f32) -> Option<Hit> {
        if self.death.is_some() {
            return None;
        }
        let position = self.position(physics)?;
        let away = direction_or(position, player, Vec2::Y);
        Some(
            Hit::new(self.tuning.contact_damage, Some(position), now)
                .with_knockback(away * self.tuning.contact_knockback_force),
        )
    }

    /// Extra shove from an overlapping attack hitbox, independent of damage
    pub fn nudge(&self, physics: &mut PhysicsWorld, attacker: Option<Vec2>) {
        if self.death.is_some() {
            return;
        }
        let Some(body) = physics.get_rigid_body_mut(self.body) else {
            return;
        };
        let position = to_vec2(body.translation());
        let away = attacker.map_or(Vec2::Y, |from| direction_or(from, position, Vec2::Y));
        let lifted = (away + Vec2::Y * NUDGE_LIFT).try_normalize().unwrap_or(Vec2::Y);
        let velocity = lifted * self.tuning.hit_knockback_force;
        body.set_linvel(to_vector(velocity), true);
    }

    /// Advance the death sequence. True once it has finished and the enemy
    /// should be removed.
    pub fn advance_death(&mut self, now: f32) -> bool {
        let Some(death) = self.death.as_mut() else {
            return false;
        };
        if let Some(phase) = death.advance(now) {
            log::debug!("Enemy {} death phase {:?}", self.id, phase);
        }
        death.is_finished()
    }

    fn die(&mut self, now: f32, ctx: &mut DamageContext<'_>) {
        if self.death.is_some() {
            return;
        }
        if let Some(body) = ctx.physics.get_rigid_body_mut(self.body) {
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_body_type(RigidBodyType::KinematicVelocityBased, true);
        }
        ctx.physics.set_collider_enabled(self.collider, false);

        self.death = Some(DeathSequence::start(now, self.tuning.death_destroy_delay));
        ctx.events.push(SimEvent::EnemyDied { enemy: self.id });
        log::info!("Enemy {} died", self.id);
    }

    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    pub fn mode(&self) -> EnemyMode {
        self.brain.mode()
    }

    pub fn brain(&self) -> &EnemyBrain {
        &self.brain
    }

    pub fn health(&self) -> &HealthPool {
        &self.health
    }

    pub fn tuning(&self) -> &EnemyTuning {
        &self.tuning
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics
            .get_rigid_body(self.body)
            .map(|body| to_vec2(body.translation()))
    }

    pub fn view(&self, physics: &PhysicsWorld, now: f32) -> EnemyView {
        let (position, velocity) = physics
            .get_rigid_body(self.body)
            .map(|body| (to_vec2(body.translation()), to_vec2(body.linvel())))
            .unwrap_or_default();

        EnemyView {
            id: self.id,
            position,
            velocity,
            mode: self.brain.mode(),
            facing: self.brain.facing(),
            health: self.health.current(),
            max_health: self.health.max(),
            alive: self.death.is_none(),
            death_phase: self.death.as_ref().map(DeathSequence::phase),
            brightness: self.death.as_ref().map_or(1.0, |d| d.brightness(now)),
            alpha: self.death.as_ref().map_or(1.0, |d| d.alpha(now)),
        }
    }
}

impl Damageable for Enemy {
    fn take_damage(&mut self, hit: &Hit, ctx: &mut DamageContext<'_>) {
        if self.death.is_some() {
            return;
        }

        let outcome = self.health.take_damage(hit.amount, hit.at);
        self.health.drain_changes();
        if outcome == DamageOutcome::Ignored {
            return;
        }

        ctx.events.push(SimEvent::EnemyHit {
            enemy: self.id,
            remaining: self.health.current(),
        });

        if let Some(body) = ctx.physics.get_rigid_body_mut(self.body) {
            let velocity = hit.knockback.unwrap_or_else(|| {
                let position = to_vec2(body.translation());
                let away = hit
                    .source
                    .map_or(Vec2::Y, |from| direction_or(from, position, Vec2::Y));
                away * self.tuning.hit_knockback_force
            });
            body.set_linvel(to_vector(velocity), true);
        }

        if outcome == DamageOutcome::Killed {
            self.die(hit.at, ctx);
        }
    }
}
