// Player character
//
// - Tuning for every controller
// - Movement (sensing, run, variable jump)
// - Dash
// - Directional attacks
// - Presentation pose
// - The Character entity tying them to a physics body

pub mod character;
pub mod combat;
pub mod dash;
pub mod movement;
pub mod state;
pub mod stats;

pub use character::{Character, PlayerView};
pub use combat::{select_hitbox, AttackPhase, CombatController, HitboxDir};
pub use dash::{DashController, DashPhase};
pub use movement::{JumpKind, MovementController, Surroundings};
pub use state::Pose;
pub use stats::{CharacterStats, CombatTuning, DashTuning, MovementTuning};
