// Game layer: the player, enemies, hazards and the arena that runs them
//
// - `arena`: owns the physics world and advances everything one fixed tick at a time
// - `damage`: the hit payload and the trait every damage receiver implements
// - `events`: notifications drained by presentation code

pub mod arena;
pub mod characters;
pub mod damage;
pub mod enemies;
pub mod error;
pub mod events;
pub mod hazards;
pub mod health;

pub use arena::Simulation;
pub use damage::{DamageContext, Damageable, Hit, Receiver};
pub use error::{SpawnError, TuningError};
pub use events::SimEvent;
pub use health::{DamageOutcome, HealthPool};
