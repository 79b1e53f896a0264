// Enemies: patrol/chase AI, contact damage and the death sequence

pub mod ai;
pub mod death;
pub mod enemy;
pub mod stats;

pub use ai::{EnemyBrain, Steering};
pub use death::{DeathPhase, DeathSequence};
pub use enemy::{Enemy, EnemyView};
pub use stats::{EnemyTuning, PatrolMode, BASE_ENEMY};

/// Unique identifier for an enemy
pub type EnemyId = u32;

/// The two AI modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnemyMode {
    #[default]
    Patrol,
    Chase,
}
