// The simulation: one physics world, one player, enemies and hazards,
// advanced one fixed tick at a time

use std::collections::HashMap;

use glam::Vec2;

use super::characters::{Character, CharacterStats, HitboxDir, PlayerView};
use super::damage::{DamageContext, Damageable, Hit, Receiver};
use super::enemies::{Enemy, EnemyId, EnemyTuning, EnemyView};
use super::error::SpawnError;
use super::events::SimEvent;
use super::hazards::{HazardId, Spike, SpikeResponse, SpikeTuning};
use crate::core::math::to_vector;
use crate::engine::game_loop::SimClock;
use crate::engine::input::TickInput;
use crate::engine::physics::{presets, ColliderHandle, CollisionEvent, PhysicsWorld};

/// Who a collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    PlayerBody,
    PlayerHitbox(HitboxDir),
    Enemy(EnemyId),
    Hazard(HazardId),
}

/// A collision pair the game cares about, player side first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encounter {
    Contact(EnemyId),
    Strike(HitboxDir, EnemyId),
    Spike(HazardId),
}

/// Hitboxes only report enemies, so hitbox/spike pairs never arrive
fn classify(a: Owner, b: Owner) -> Option<Encounter> {
    match (a, b) {
        (Owner::PlayerBody, Owner::Enemy(id)) | (Owner::Enemy(id), Owner::PlayerBody) => {
            Some(Encounter::Contact(id))
        }
        (Owner::PlayerBody, Owner::Hazard(id)) | (Owner::Hazard(id), Owner::PlayerBody) => {
            Some(Encounter::Spike(id))
        }
        (Owner::PlayerHitbox(dir), Owner::Enemy(id)) | (Owner::Enemy(id), Owner::PlayerHitbox(dir)) => {
            Some(Encounter::Strike(dir, id))
        }
        _ => None,
    }
}

pub struct Simulation {
    physics: PhysicsWorld,
    clock: SimClock,
    player: Option<Character>,
    enemies: Vec<Enemy>,
    hazards: Vec<Spike>,
    owners: HashMap<ColliderHandle, Owner>,
    next_enemy_id: EnemyId,
    next_hazard_id: HazardId,
    platforms: usize,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_physics(PhysicsWorld::new())
    }

    pub fn with_gravity(gravity: Vec2) -> Self {
        Self::with_physics(PhysicsWorld::with_gravity(to_vector(gravity)))
    }

    fn with_physics(physics: PhysicsWorld) -> Self {
        Self {
            clock: SimClock::new(physics.timestep()),
            physics,
            player: None,
            enemies: Vec::new(),
            hazards: Vec::new(),
            owners: HashMap::new(),
            next_enemy_id: 0,
            next_hazard_id: 0,
            platforms: 0,
            events: Vec::new(),
        }
    }

    /// Static ground-layer box (floor, platform or wall)
    pub fn add_platform(&mut self, center: Vec2, size: Vec2) -> ColliderHandle {
        self.platforms += 1;
        let body = self.physics.add_rigid_body(presets::ground_body(center.x, center.y));
        self.physics
            .add_collider(presets::ground_collider(size.x, size.y), body)
    }

    pub fn spawn_player(&mut self, stats: CharacterStats, position: Vec2) -> Result<(), SpawnError> {
        if self.player.is_some() {
            return Err(SpawnError::PlayerExists);
        }
        let mut player = Character::spawn(stats, &mut self.physics, position)?;
        if self.platforms == 0 {
            log::warn!("Player spawned with no ground geometry; it will never be grounded");
        }

        self.owners.insert(player.collider(), Owner::PlayerBody);
        for dir in HitboxDir::ALL {
            self.owners
                .insert(player.hitbox_colliders()[dir.index()], Owner::PlayerHitbox(dir));
        }
        player.flush_health(&mut self.events);
        self.player = Some(player);
        Ok(())
    }

    pub fn spawn_enemy(&mut self, tuning: EnemyTuning, position: Vec2) -> Result<EnemyId, SpawnError> {
        let id = self.next_enemy_id;
        let enemy = Enemy::spawn(id, tuning, &mut self.physics, position)?;
        self.next_enemy_id += 1;

        self.owners.insert(enemy.collider(), Owner::Enemy(id));
        self.enemies.push(enemy);
        Ok(id)
    }

    pub fn spawn_spike(&mut self, tuning: SpikeTuning, position: Vec2) -> Result<HazardId, SpawnError> {
        let id = self.next_hazard_id;
        let spike = Spike::spawn(id, tuning, &mut self.physics, position)?;
        self.next_hazard_id += 1;

        self.owners.insert(spike.collider(), Owner::Hazard(id));
        self.hazards.push(spike);
        Ok(id)
    }

    /// Run one fixed tick
    pub fn tick(&mut self, input: &TickInput) {
        let now = self.clock.now();
        let dt = self.clock.dt();

        if let Some(player) = self.player.as_mut() {
            player.tick(input, now, dt, &mut self.physics, &mut self.events);
        }

        let player_position = self
            .player
            .as_ref()
            .and_then(|player| player.position(&self.physics));
        for enemy in &mut self.enemies {
            enemy.steer(&mut self.physics, player_position, &mut self.events);
        }

        self.physics.step();

        for event in self.physics.drain_collision_events() {
            self.resolve_collision(event);
        }

        self.advance_deaths(now);

        if let Some(player) = self.player.as_mut() {
            player.update_pose(&self.physics, dt);
        }

        self.clock.advance();
    }

    /// Route a collision event to the attacker/receiver pair it describes.
    /// Only starts matter; unknown colliders are ignored.
    pub fn resolve_collision(&mut self, event: CollisionEvent) {
        let CollisionEvent::Started {
            collider1,
            collider2,
            ..
        } = event
        else {
            return;
        };
        let (Some(&a), Some(&b)) = (self.owners.get(&collider1), self.owners.get(&collider2)) else {
            return;
        };
        let Some(encounter) = classify(a, b) else {
            return;
        };

        let now = self.clock.now();
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let player_position = player.position(&self.physics);

        match encounter {
            Encounter::Contact(id) => {
                let hit = self
                    .enemies
                    .iter()
                    .find(|e| e.id() == id)
                    .zip(player_position)
                    .and_then(|(enemy, at)| enemy.contact_hit(&self.physics, at, now));
                if let Some(hit) = hit {
                    self.apply_hit(Receiver::Player, &hit);
                }
            }

            Encounter::Spike(id) => {
                let Some(spike) = self.hazards.iter().find(|s| s.id() == id) else {
                    return;
                };
                match spike.respond(player.has_active_hitbox(), now) {
                    SpikeResponse::Parry(velocity) => {
                        player.set_velocity(&mut self.physics, velocity);
                        self.events.push(SimEvent::Parried);
                        log::debug!("Spike {} parried", id);
                    }
                    SpikeResponse::Damage(hit) => self.apply_hit(Receiver::Player, &hit),
                }
            }

            Encounter::Strike(dir, id) => {
                // Stale event from a hitbox that has since closed
                if player.active_hitbox() != Some(dir) {
                    return;
                }
                let hit = Hit::new(player.attack_damage(), player_position, now);
                self.apply_hit(Receiver::Enemy(id), &hit);
                if let Some(enemy) = self.enemies.iter().find(|e| e.id() == id) {
                    enemy.nudge(&mut self.physics, player_position);
                }
            }
        }
    }

    /// Deliver a hit through the receiver's [`Damageable`] impl. Unknown ids
    /// are ignored.
    pub fn apply_hit(&mut self, receiver: Receiver, hit: &Hit) {
        let mut ctx = DamageContext {
            physics: &mut self.physics,
            events: &mut self.events,
        };
        let target: Option<&mut dyn Damageable> = match receiver {
            Receiver::Player => self.player.as_mut().map(|p| p as &mut dyn Damageable),
            Receiver::Enemy(id) => self
                .enemies
                .iter_mut()
                .find(|e| e.id() == id)
                .map(|e| e as &mut dyn Damageable),
            Receiver::Hazard(id) => self
                .hazards
                .iter_mut()
                .find(|s| s.id() == id)
                .map(|s| s as &mut dyn Damageable),
        };
        if let Some(target) = target {
            target.take_damage(hit, &mut ctx);
        }
    }

    /// Advance death sequences and remove enemies whose sequence finished
    fn advance_deaths(&mut self, now: f32) {
        let mut removed = Vec::new();
        self.enemies.retain_mut(|enemy| {
            if enemy.advance_death(now) {
                removed.push((enemy.id(), enemy.body(), enemy.collider()));
                false
            } else {
                true
            }
        });

        for (id, body, collider) in removed {
            self.physics.remove_rigid_body(body);
            self.owners.remove(&collider);
            self.events.push(SimEvent::EnemyRemoved { enemy: id });
            log::debug!("Enemy {} removed", id);
        }
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player(&self) -> Option<&Character> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Character> {
        self.player.as_mut()
    }

    /// Heal the player; no-op without one
    pub fn heal_player(&mut self, amount: i32) {
        if let Some(player) = self.player.as_mut() {
            player.heal(amount, &mut self.events);
        }
    }

    pub fn set_player_max_health(&mut self, max: i32) {
        if let Some(player) = self.player.as_mut() {
            player.set_max_health(max, &mut self.events);
        }
    }

    pub fn player_view(&self) -> Option<PlayerView> {
        self.player
            .as_ref()
            .map(|player| player.view(&self.physics, self.clock.now()))
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn enemy_views(&self) -> Vec<EnemyView> {
        let now = self.clock.now();
        self.enemies
            .iter()
            .map(|enemy| enemy.view(&self.physics, now))
            .collect()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn spike(&self, id: HazardId) -> Option<&Spike> {
        self.hazards.iter().find(|s| s.id() == id)
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::{Action, Edge};
    use crate::game::enemies::{DeathPhase, EnemyMode};
    use crate::game::error::TuningError;

    fn started(a: ColliderHandle, b: ColliderHandle, sensor: bool) -> CollisionEvent {
        CollisionEvent::Started {
            collider1: a,
            collider2: b,
            sensor,
        }
    }

    /// Zero-gravity arena with the player at the origin and an enemy far away
    fn floating() -> (Simulation, EnemyId) {
        let mut sim = Simulation::with_gravity(Vec2::ZERO);
        sim.spawn_player(CharacterStats::default(), Vec2::ZERO)
            .expect("player spawns");
        let enemy = sim
            .spawn_enemy(EnemyTuning::default(), Vec2::new(30.0, 0.0))
            .expect("enemy spawns");
        sim.drain_events();
        (sim, enemy)
    }

    fn player_collider(sim: &Simulation) -> ColliderHandle {
        sim.player().map(Character::collider).expect("player")
    }

    fn enemy_collider(sim: &Simulation, id: EnemyId) -> ColliderHandle {
        sim.enemy(id).map(Enemy::collider).expect("enemy")
    }

    /// Start an attack and return the hitbox collider it enabled
    fn attack(sim: &mut Simulation) -> ColliderHandle {
        sim.tick(&TickInput::default().with(Action::Attack, Edge::Pressed));
        let dir = sim
            .player_view()
            .and_then(|view| view.active_hitbox)
            .expect("attack started");
        sim.player().expect("player").hitbox_colliders()[dir.index()]
    }

    fn idle(sim: &mut Simulation, seconds: f32) {
        let ticks = (seconds / sim.physics().timestep()).round() as usize;
        for _ in 0..ticks {
            sim.tick(&TickInput::default());
        }
    }

    #[test]
    fn test_spawn_rules() {
        let mut sim = Simulation::new();
        sim.spawn_player(CharacterStats::default(), Vec2::ZERO)
            .expect("first player");
        assert_eq!(
            sim.spawn_player(CharacterStats::default(), Vec2::ZERO),
            Err(SpawnError::PlayerExists)
        );
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::HealthChanged { current: 5, max: 5 }]
        );

        let bad = EnemyTuning {
            patrol_speed: -1.0,
            ..EnemyTuning::default()
        };
        assert!(matches!(
            sim.spawn_enemy(bad, Vec2::ZERO),
            Err(SpawnError::Tuning(TuningError::Negative { .. }))
        ));
        assert_eq!(sim.enemy_count(), 0);
    }

    #[test]
    fn test_player_lands_on_floor() {
        let mut sim = Simulation::new();
        sim.add_platform(Vec2::ZERO, Vec2::new(40.0, 1.0));
        sim.spawn_player(CharacterStats::default(), Vec2::new(0.0, 4.0))
            .expect("player spawns");

        idle(&mut sim, 2.0);

        let view = sim.player_view().expect("player");
        assert!(view.grounded);
        assert!(view.position.y > 1.0 && view.position.y < 2.0);
        assert_eq!(sim.tick_count(), 120);
    }

    #[test]
    fn test_player_in_air_is_not_grounded() {
        let mut sim = Simulation::with_gravity(Vec2::ZERO);
        sim.add_platform(Vec2::ZERO, Vec2::new(40.0, 1.0));
        sim.spawn_player(CharacterStats::default(), Vec2::new(0.0, 5.0))
            .expect("player spawns");
        idle(&mut sim, 0.1);
        assert!(!sim.player_view().expect("player").grounded);
    }

    #[test]
    fn test_enemy_contact_damages_and_pushes_player() {
        let (mut sim, enemy) = floating();
        let (p, e) = (player_collider(&sim), enemy_collider(&sim, enemy));

        sim.resolve_collision(started(e, p, false));
        let view = sim.player_view().expect("player");
        assert_eq!(view.health, 4);
        // Pushed away from the enemy on the right
        assert_eq!(view.velocity, Vec2::new(-5.0, 0.0));
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::HealthChanged { current: 4, max: 5 }]
        );

        // Second touch inside the invulnerability window
        sim.resolve_collision(started(p, e, false));
        assert_eq!(sim.player_view().expect("player").health, 4);
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_stopped_and_unknown_events_are_ignored() {
        let (mut sim, enemy) = floating();
        let (p, e) = (player_collider(&sim), enemy_collider(&sim, enemy));
        sim.resolve_collision(CollisionEvent::Stopped {
            collider1: p,
            collider2: e,
            sensor: false,
        });
        let floor = sim.add_platform(Vec2::new(0.0, -10.0), Vec2::new(5.0, 1.0));
        sim.resolve_collision(started(p, floor, false));
        assert_eq!(sim.player_view().expect("player").health, 5);
    }

    #[test]
    fn test_hitbox_kills_enemy_which_is_then_removed() {
        let (mut sim, enemy) = floating();
        let e = enemy_collider(&sim, enemy);

        for _ in 0..3 {
            let hitbox = attack(&mut sim);
            sim.resolve_collision(started(hitbox, e, true));
            idle(&mut sim, 0.5);
        }

        let events = sim.drain_events();
        let hits: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::EnemyHit { remaining, .. } => Some(*remaining),
                _ => None,
            })
            .collect();
        assert_eq!(hits, vec![2, 1, 0]);
        assert!(events.contains(&SimEvent::EnemyDied { enemy }));

        let view = sim.enemy_views()[0];
        assert!(!view.alive);
        assert!(matches!(
            view.death_phase,
            Some(DeathPhase::Darken | DeathPhase::Fade)
        ));

        idle(&mut sim, 2.0);
        assert_eq!(sim.enemy_count(), 0);
        assert!(sim.drain_events().contains(&SimEvent::EnemyRemoved { enemy }));
        assert!(sim.physics().get_collider(e).is_none());
    }

    #[test]
    fn test_closed_hitbox_does_not_strike() {
        let (mut sim, enemy) = floating();
        let e = enemy_collider(&sim, enemy);
        let hitbox = attack(&mut sim);
        idle(&mut sim, 0.3);

        sim.resolve_collision(started(hitbox, e, true));
        assert_eq!(sim.enemy(enemy).map(|e| e.health().current()), Some(3));
    }

    #[test]
    fn test_spike_touch_damages() {
        let (mut sim, _) = floating();
        let spike = sim
            .spawn_spike(SpikeTuning::default(), Vec2::new(-30.0, 0.0))
            .expect("spike spawns");
        let s = sim.spike(spike).map(Spike::collider).expect("spike");
        let p = player_collider(&sim);

        sim.resolve_collision(started(s, p, true));
        let view = sim.player_view().expect("player");
        assert_eq!(view.health, 4);
        assert_eq!(view.velocity, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_attacking_player_parries_spike() {
        let (mut sim, _) = floating();
        let spike = sim
            .spawn_spike(SpikeTuning::default(), Vec2::new(-30.0, 0.0))
            .expect("spike spawns");
        let s = sim.spike(spike).map(Spike::collider).expect("spike");
        let p = player_collider(&sim);

        let hitbox = attack(&mut sim);
        sim.drain_events();
        sim.resolve_collision(started(p, s, true));

        let view = sim.player_view().expect("player");
        assert_eq!(view.health, 5);
        assert_eq!(view.velocity, Vec2::new(0.0, 7.0));
        assert_eq!(sim.drain_events(), vec![SimEvent::Parried]);

        // Hitbox/spike pairs are not encounters
        sim.resolve_collision(started(hitbox, s, true));
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_apply_hit_dispatches_by_receiver() {
        let (mut sim, enemy) = floating();
        let spike = sim
            .spawn_spike(SpikeTuning::default(), Vec2::new(-30.0, 0.0))
            .expect("spike spawns");
        let hit = Hit::new(1, None, 0.0);

        sim.apply_hit(Receiver::Hazard(spike), &hit);
        sim.apply_hit(Receiver::Enemy(99), &hit);
        assert!(sim.drain_events().is_empty());

        sim.apply_hit(Receiver::Enemy(enemy), &hit);
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::EnemyHit {
                enemy,
                remaining: 2
            }]
        );

        sim.apply_hit(Receiver::Player, &hit);
        assert_eq!(sim.player_view().map(|view| view.health), Some(4));
    }

    #[test]
    fn test_hitbox_and_hazard_layers_never_pair() {
        use crate::engine::physics::CollisionLayer;
        let hitbox = CollisionLayer::PlayerHitbox.to_interaction_groups();
        let hazard = CollisionLayer::Hazard.to_interaction_groups();
        assert!(!hitbox.test(hazard));
        assert_eq!(
            classify(Owner::PlayerHitbox(HitboxDir::Down), Owner::Hazard(0)),
            None
        );
        assert_eq!(
            classify(Owner::Enemy(3), Owner::PlayerHitbox(HitboxDir::Left)),
            Some(Encounter::Strike(HitboxDir::Left, 3))
        );
    }

    #[test]
    fn test_enemy_notices_nearby_player() {
        let mut sim = Simulation::with_gravity(Vec2::ZERO);
        sim.spawn_player(CharacterStats::default(), Vec2::new(2.5, 0.0))
            .expect("player spawns");
        let enemy = sim
            .spawn_enemy(EnemyTuning::default(), Vec2::ZERO)
            .expect("enemy spawns");
        sim.drain_events();

        sim.tick(&TickInput::default());
        assert_eq!(sim.enemy(enemy).map(Enemy::mode), Some(EnemyMode::Chase));
        assert!(sim.drain_events().contains(&SimEvent::EnemyModeChanged {
            enemy,
            mode: EnemyMode::Chase
        }));
        assert!(sim.enemy_views()[0].velocity.x > 0.0);
    }

    #[test]
    fn test_player_death_is_terminal() {
        let (mut sim, enemy) = floating();
        let (p, e) = (player_collider(&sim), enemy_collider(&sim, enemy));
        sim.set_player_max_health(1);
        sim.resolve_collision(started(p, e, false));

        let events = sim.drain_events();
        assert!(events.contains(&SimEvent::PlayerDied));
        let view = sim.player_view().expect("player stays in the arena");
        assert!(!view.alive);

        sim.heal_player(1);
        assert_eq!(sim.player_view().expect("player").health, 0);
    }
}
