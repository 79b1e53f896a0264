// The player character: physics handles plus the three controllers

use glam::Vec2;

use crate::core::math::{to_vec2, to_vector};
use crate::engine::input::TickInput;
use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::damage::{DamageContext, Damageable, Hit};
use crate::game::error::TuningError;
use crate::game::events::SimEvent;
use crate::game::health::{DamageOutcome, HealthPool};

use super::combat::{CombatController, HitboxDir};
use super::dash::{DashController, DashTick};
use super::movement::{JumpKind, MovementController, Surroundings};
use super::state::{Pose, PoseInput, PoseTracker};
use super::stats::CharacterStats;

/// Read-only snapshot for presentation and camera code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub velocity: Vec2,
    /// +1 right, -1 left
    pub facing: f32,
    pub grounded: bool,
    pub in_dash: bool,
    pub alive: bool,
    pub health: i32,
    pub max_health: i32,
    pub invulnerable: bool,
    /// False during the "off" phases of the invulnerability blink
    pub visible: bool,
    pub active_hitbox: Option<HitboxDir>,
    pub pose: Pose,
}

/// The player
#[derive(Debug)]
pub struct Character {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    /// Indexed by [`HitboxDir::index`]
    hitboxes: [ColliderHandle; 4],

    stats: CharacterStats,
    health: HealthPool,
    movement: MovementController,
    dash: DashController,
    combat: CombatController,
    pose: PoseTracker,

    surroundings: Surroundings,
    alive: bool,
}

impl Character {
    /// Validate the stats and add the body, its collider and the four
    /// (disabled) attack hitboxes to the world
    pub fn spawn(
        stats: CharacterStats,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Result<Self, TuningError> {
        stats.validate()?;

        let body = physics.add_rigid_body(presets::player_body(position.x, position.y));
        let collider = physics.add_collider(presets::player_collider(stats.width, stats.height), body);

        let half = stats.combat.hitbox_half_size;
        let horizontal = stats.combat.hitbox_reach;
        // Tall bodies need the vertical hitboxes pushed further out
        let vertical = horizontal + (stats.height - stats.width).max(0.0) / 2.0;
        let hitboxes = HitboxDir::ALL.map(|dir| {
            let offset = dir.offset(horizontal, vertical);
            physics.add_collider(presets::hitbox_collider(half, half, offset.x, offset.y), body)
        });

        log::info!("Player spawned at ({:.2}, {:.2})", position.x, position.y);

        Ok(Self {
            body,
            collider,
            hitboxes,
            health: HealthPool::new(
                stats.combat.max_health,
                stats.combat.invul_duration,
                stats.combat.blink_interval,
            ),
            movement: MovementController::new(stats.movement.clone()),
            dash: DashController::new(stats.dash.clone()),
            combat: CombatController::new(stats.combat.clone()),
            pose: PoseTracker::new(),
            surroundings: Surroundings::default(),
            alive: true,
            stats,
        })
    }

    /// Sense, move, dash and attack for one tick. Runs before the physics step.
    pub fn tick(
        &mut self,
        input: &TickInput,
        now: f32,
        dt: f32,
        physics: &mut PhysicsWorld,
        events: &mut Vec<SimEvent>,
    ) {
        self.surroundings = Surroundings::sense(
            physics,
            self.body,
            Some(self.collider),
            self.movement.tuning(),
            input.move_axis.x,
        );

        let mut trail = Vec::new();
        {
            let Some(body) = physics.get_rigid_body_mut(self.body) else {
                log::debug!("Player body missing, skipping tick");
                return;
            };

            let in_dash = self.dash.is_active();
            if let Some(kind) = self.movement.update(input, self.surroundings, body, in_dash, dt) {
                events.push(SimEvent::JumpStarted {
                    buffered: kind == JumpKind::Buffered,
                });
            }

            if self.alive && input.dash_pressed {
                if let Some(direction) = self.dash.try_start(now, self.movement.facing(), body) {
                    events.push(SimEvent::DashStarted { direction });
                }
            }
            if self.dash.update(now, body, &mut trail) == DashTick::Ended {
                events.push(SimEvent::DashEnded);
            }
        }

        let facing = self.movement.facing();
        events.extend(
            trail
                .into_iter()
                .map(|position| SimEvent::TrailSample { position, facing }),
        );

        if let Some(closed) = self.combat.update(now) {
            physics.set_collider_enabled(self.hitboxes[closed.index()], false);
            events.push(SimEvent::AttackEnded { hitbox: closed });
        }
        if self.alive && input.attack_pressed {
            let grounded = self.surroundings.grounded;
            if let Some(hitbox) = self.combat.try_attack(now, input.move_axis, grounded, facing) {
                physics.set_collider_enabled(self.hitboxes[hitbox.index()], true);
                events.push(SimEvent::AttackStarted { hitbox });
            }
        }

        self.flush_health(events);
    }

    /// Refresh the presentation pose from the post-step body
    pub fn update_pose(&mut self, physics: &PhysicsWorld, dt: f32) {
        let velocity = physics
            .get_rigid_body(self.body)
            .map(|body| to_vec2(body.linvel()))
            .unwrap_or_default();
        let pose = Pose::derive(&PoseInput {
            alive: self.alive,
            in_dash: self.dash.is_active(),
            attack: self.combat.active_hitbox(),
            grounded: self.surroundings.grounded,
            velocity,
        });
        if self.pose.update(pose, dt) {
            log::trace!("Player pose: {}", pose.animation_name());
        }
    }

    /// Forward queued health notifications
    pub fn flush_health(&mut self, events: &mut Vec<SimEvent>) {
        events.extend(
            self.health
                .drain_changes()
                .into_iter()
                .map(|change| SimEvent::HealthChanged {
                    current: change.current,
                    max: change.max,
                }),
        );
    }

    /// One-shot. Input stops and any dash or attack in progress is cut off.
    fn die(&mut self, ctx: &mut DamageContext<'_>) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.movement.disable();

        if let Some(body) = ctx.physics.get_rigid_body_mut(self.body) {
            if self.dash.cancel(body) {
                ctx.events.push(SimEvent::DashEnded);
            }
        }
        if let Some(hitbox) = self.combat.cancel() {
            ctx.physics.set_collider_enabled(self.hitboxes[hitbox.index()], false);
            ctx.events.push(SimEvent::AttackEnded { hitbox });
        }

        ctx.events.push(SimEvent::PlayerDied);
        log::info!("Player died");
    }

    /// Overwrite the body's velocity (knockback, parry bounce)
    pub fn set_velocity(&self, physics: &mut PhysicsWorld, velocity: Vec2) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    pub fn heal(&mut self, amount: i32, events: &mut Vec<SimEvent>) {
        self.health.heal(amount);
        self.flush_health(events);
    }

    pub fn set_max_health(&mut self, max: i32, events: &mut Vec<SimEvent>) {
        self.health.set_max(max);
        self.flush_health(events);
    }

    pub fn grant_dash(&mut self) {
        self.dash.grant_dash();
    }

    pub fn has_dash(&self) -> bool {
        self.dash.has_dash()
    }

    pub fn set_dash_cooldown(&mut self, seconds: f32) {
        self.dash.set_cooldown(seconds);
    }

    /// Which attack hitbox a collider is, if it is one of ours
    pub fn hitbox_for(&self, collider: ColliderHandle) -> Option<HitboxDir> {
        HitboxDir::ALL
            .into_iter()
            .find(|dir| self.hitboxes[dir.index()] == collider)
    }

    pub fn hitbox_colliders(&self) -> &[ColliderHandle; 4] {
        &self.hitboxes
    }

    pub fn active_hitbox(&self) -> Option<HitboxDir> {
        self.combat.active_hitbox()
    }

    pub fn has_active_hitbox(&self) -> bool {
        self.combat.active_hitbox().is_some()
    }

    pub fn attack_damage(&self) -> i32 {
        self.combat.damage()
    }

    pub fn is_invulnerable(&self, now: f32) -> bool {
        self.health.is_invulnerable(now)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics
            .get_rigid_body(self.body)
            .map(|body| to_vec2(body.translation()))
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn health(&self) -> &HealthPool {
        &self.health
    }

    pub fn view(&self, physics: &PhysicsWorld, now: f32) -> PlayerView {
        let (position, velocity) = physics
            .get_rigid_body(self.body)
            .map(|body| (to_vec2(body.translation()), to_vec2(body.linvel())))
            .unwrap_or_default();

        PlayerView {
            position,
            velocity,
            facing: self.movement.facing(),
            grounded: self.surroundings.grounded,
            in_dash: self.dash.is_active(),
            alive: self.alive,
            health: self.health.current(),
            max_health: self.health.max(),
            invulnerable: self.health.is_invulnerable(now),
            visible: self.health.visible(now),
            active_hitbox: self.combat.active_hitbox(),
            pose: self.pose.current(),
        }
    }
}

impl Damageable for Character {
    fn take_damage(&mut self, hit: &Hit, ctx: &mut DamageContext<'_>) {
        if !self.alive {
            return;
        }

        let outcome = self.health.take_damage(hit.amount, hit.at);
        if outcome == DamageOutcome::Ignored {
            return;
        }

        log::info!(
            "Player took {} damage ({}/{})",
            hit.amount,
            self.health.current(),
            self.health.max()
        );

        if let Some(velocity) = hit.knockback {
            self.set_velocity(ctx.physics, velocity);
        }
        self.flush_health(ctx.events);

        if outcome == DamageOutcome::Killed {
            self.die(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::FIXED_TIMESTEP;
    use crate::engine::input::{Action, Edge};

    /// Floor with its top at y = 0.5 and a player standing on it
    fn setup(stats: CharacterStats) -> (PhysicsWorld, Character, Vec<SimEvent>) {
        let mut physics = PhysicsWorld::new();
        let floor = physics.add_rigid_body(presets::ground_body(0.0, 0.0));
        physics.add_collider(presets::ground_collider(40.0, 1.0), floor);

        let mut events = Vec::new();
        let mut player = Character::spawn(stats, &mut physics, Vec2::new(0.0, 1.5))
            .expect("valid stats");
        player.flush_health(&mut events);
        physics.step();
        (physics, player, events)
    }

    fn enabled_hitboxes(physics: &PhysicsWorld, player: &Character) -> usize {
        player
            .hitbox_colliders()
            .iter()
            .filter(|handle| physics.get_collider(**handle).is_some_and(|c| c.is_enabled()))
            .count()
    }

    #[test]
    fn test_spawn_rejects_bad_stats() {
        let mut physics = PhysicsWorld::new();
        let stats = CharacterStats {
            width: 0.0,
            ..CharacterStats::default()
        };
        assert!(Character::spawn(stats, &mut physics, Vec2::ZERO).is_err());
    }

    #[test]
    fn test_spawn_announces_full_health() {
        let (_, _, events) = setup(CharacterStats::default());
        assert_eq!(events, vec![SimEvent::HealthChanged { current: 5, max: 5 }]);
    }

    #[test]
    fn test_jump_from_floor() {
        let (mut physics, mut player, mut events) = setup(CharacterStats::default());
        events.clear();

        let input = TickInput::default().with(Action::Jump, Edge::Pressed);
        player.tick(&input, 0.0, FIXED_TIMESTEP, &mut physics, &mut events);

        let view = player.view(&physics, 0.0);
        assert!(view.grounded);
        assert_eq!(view.velocity.y, 8.0);
        assert_eq!(events, vec![SimEvent::JumpStarted { buffered: false }]);
    }

    #[test]
    fn test_attack_enables_exactly_one_hitbox() {
        let (mut physics, mut player, mut events) = setup(CharacterStats::default());
        let attack = TickInput::moving(0.0, 1.0).with(Action::Attack, Edge::Pressed);
        player.tick(&attack, 0.0, FIXED_TIMESTEP, &mut physics, &mut events);

        assert_eq!(enabled_hitboxes(&physics, &player), 1);
        assert!(events.contains(&SimEvent::AttackStarted {
            hitbox: HitboxDir::Up
        }));
        let up = player.hitbox_colliders()[HitboxDir::Up.index()];
        assert_eq!(player.hitbox_for(up), Some(HitboxDir::Up));

        let mut now = 0.0;
        while now < 0.2 {
            now += FIXED_TIMESTEP;
            player.tick(&TickInput::default(), now, FIXED_TIMESTEP, &mut physics, &mut events);
        }
        assert_eq!(enabled_hitboxes(&physics, &player), 0);
        assert!(events.contains(&SimEvent::AttackEnded {
            hitbox: HitboxDir::Up
        }));
    }

    #[test]
    fn test_dash_needs_unlock() {
        let (mut physics, mut player, mut events) = setup(CharacterStats::default());
        let dash = TickInput::default().with(Action::Dash, Edge::Pressed);
        player.tick(&dash, 0.0, FIXED_TIMESTEP, &mut physics, &mut events);
        assert!(!player.view(&physics, 0.0).in_dash);

        player.grant_dash();
        assert!(player.has_dash());
        player.tick(&dash, FIXED_TIMESTEP, FIXED_TIMESTEP, &mut physics, &mut events);
        let view = player.view(&physics, FIXED_TIMESTEP);
        assert!(view.in_dash);
        assert!(view.velocity.x > 30.0);
        assert!(events.contains(&SimEvent::DashStarted { direction: 1.0 }));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::TrailSample { .. })));
    }

    #[test]
    fn test_knockback_applies_only_when_hit_lands() {
        let (mut physics, mut player, mut events) = setup(CharacterStats::default());
        let hit = Hit::new(1, None, 1.0).with_knockback(Vec2::new(3.0, 4.0));

        let mut ctx = DamageContext {
            physics: &mut physics,
            events: &mut events,
        };
        player.take_damage(&hit, &mut ctx);
        assert_eq!(player.view(&physics, 1.0).velocity, Vec2::new(3.0, 4.0));
        assert_eq!(player.health().current(), 4);

        player.set_velocity(&mut physics, Vec2::ZERO);
        let mut ctx = DamageContext {
            physics: &mut physics,
            events: &mut events,
        };
        // Inside the invulnerability window
        player.take_damage(&hit, &mut ctx);
        assert_eq!(player.view(&physics, 1.5).velocity, Vec2::ZERO);
        assert_eq!(player.health().current(), 4);
    }

    #[test]
    fn test_death_disables_input() {
        let (mut physics, mut player, mut events) = setup(CharacterStats::default());
        let mut ctx = DamageContext {
            physics: &mut physics,
            events: &mut events,
        };
        player.take_damage(&Hit::new(99, None, 0.0), &mut ctx);
        assert!(!player.is_alive());
        assert_eq!(
            events.iter().filter(|e| **e == SimEvent::PlayerDied).count(),
            1
        );

        let input = TickInput::moving(1.0, 0.0)
            .with(Action::Jump, Edge::Pressed)
            .with(Action::Attack, Edge::Pressed);
        player.tick(&input, 0.1, FIXED_TIMESTEP, &mut physics, &mut events);
        assert_eq!(enabled_hitboxes(&physics, &player), 0);
        assert!(!events.contains(&SimEvent::JumpStarted { buffered: false }));

        player.update_pose(&physics, FIXED_TIMESTEP);
        assert_eq!(player.view(&physics, 0.1).pose, Pose::Dead);
    }

    #[test]
    fn test_death_cuts_off_dash_and_attack() {
        let (mut physics, mut player, mut events) = setup(CharacterStats::default());
        player.grant_dash();
        let input = TickInput::default()
            .with(Action::Dash, Edge::Pressed)
            .with(Action::Attack, Edge::Pressed);
        player.tick(&input, 0.0, FIXED_TIMESTEP, &mut physics, &mut events);
        let view = player.view(&physics, 0.0);
        assert!(view.in_dash);
        assert!(view.active_hitbox.is_some());
        events.clear();

        let mut ctx = DamageContext {
            physics: &mut physics,
            events: &mut events,
        };
        player.take_damage(&Hit::new(99, None, 0.05), &mut ctx);

        let view = player.view(&physics, 0.05);
        assert!(!view.in_dash);
        assert_eq!(view.active_hitbox, None);
        assert_eq!(enabled_hitboxes(&physics, &player), 0);
        let gravity = physics
            .get_rigid_body(player.body())
            .map(|body| body.gravity_scale());
        assert_eq!(gravity, Some(1.0));
        assert!(events.contains(&SimEvent::DashEnded));
        assert!(events.contains(&SimEvent::PlayerDied));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::AttackEnded { .. })));
    }

    #[test]
    fn test_heal_and_set_max_notify() {
        let (_, mut player, mut events) = setup(CharacterStats::default());
        events.clear();
        player.set_max_health(3, &mut events);
        player.heal(1, &mut events);
        assert_eq!(
            events,
            vec![
                SimEvent::HealthChanged { current: 3, max: 3 },
                SimEvent::HealthChanged { current: 3, max: 3 },
            ]
        );
    }
}
