// Observable simulation events, drained by presentation each frame

use glam::Vec2;

use super::characters::HitboxDir;
use super::enemies::{EnemyId, EnemyMode};

/// Something presentation (UI, audio, VFX, camera) may want to react to.
/// None of these feed back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Player health mutated
    HealthChanged { current: i32, max: i32 },
    PlayerDied,
    JumpStarted { buffered: bool },
    DashStarted { direction: f32 },
    DashEnded,
    /// Afterimage sample for the dash trail
    TrailSample { position: Vec2, facing: f32 },
    AttackStarted { hitbox: HitboxDir },
    AttackEnded { hitbox: HitboxDir },
    /// Player struck a hazard with an active hitbox and bounced off
    Parried,
    EnemyModeChanged { enemy: EnemyId, mode: EnemyMode },
    EnemyHit { enemy: EnemyId, remaining: i32 },
    EnemyDied { enemy: EnemyId },
    EnemyRemoved { enemy: EnemyId },
}
