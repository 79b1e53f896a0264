// Character tuning - one const per controller, grouped in CharacterStats
//
// Values match the shipped game's defaults. Every struct validates itself
// once at spawn so the per-tick code never has to.

use glam::Vec2;

use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::game::error::{non_negative, positive, TuningError};

/// Fallback ground sensor for bodies without a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundCheckPoint {
    /// Offset from the body's origin
    pub offset: Vec2,
    pub radius: f32,
}

/// Horizontal control and the variable-height jump
#[derive(Debug, Clone, PartialEq)]
pub struct MovementTuning {
    /// Horizontal speed at full input (units/second)
    pub move_speed: f32,
    /// Vertical velocity set when a jump starts
    pub jump_force: f32,
    /// Upward acceleration added while jump stays held
    pub jump_hold_force: f32,
    /// How long holding jump keeps boosting
    pub jump_hold_duration: f32,
    /// Used only when the body has no collider
    pub ground_check: Option<GroundCheckPoint>,
    /// How far below the collider the ground probe reaches
    pub ground_check_distance: f32,
    /// How far beside the collider the wall probe reaches
    pub wall_check_distance: f32,
}

pub const BASE_MOVEMENT: MovementTuning = MovementTuning {
    move_speed: 5.0,
    jump_force: 8.0,
    jump_hold_force: 3.0,
    jump_hold_duration: 0.25,
    ground_check: Some(GroundCheckPoint {
        offset: Vec2::new(0.0, -1.0),
        radius: 0.2,
    }),
    ground_check_distance: 0.08,
    wall_check_distance: 0.06,
};

impl Default for MovementTuning {
    fn default() -> Self {
        BASE_MOVEMENT
    }
}

impl MovementTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        non_negative("move_speed", self.move_speed)?;
        non_negative("jump_force", self.jump_force)?;
        non_negative("jump_hold_force", self.jump_hold_force)?;
        // Zero hold duration is allowed: it just disables the boost
        non_negative("jump_hold_duration", self.jump_hold_duration)?;
        non_negative("ground_check_distance", self.ground_check_distance)?;
        non_negative("wall_check_distance", self.wall_check_distance)?;
        if let Some(check) = self.ground_check {
            non_negative("ground_check.radius", check.radius)?;
        }
        Ok(())
    }

    /// Height above the take-off point a jump reaches under `gravity`
    /// (magnitude, already multiplied by the body's gravity scale).
    ///
    /// Degenerate inputs yield 0 rather than NaN or infinity: without gravity
    /// there is no apex, and a non-positive hold duration means no boost.
    pub fn apex_height(&self, gravity: f32, full_hold: bool) -> f32 {
        if !(gravity.is_finite() && gravity > 0.0) {
            return 0.0;
        }
        let v0 = self.jump_force;
        if !(v0 > 0.0) {
            return 0.0;
        }
        let hold = if full_hold && self.jump_hold_duration > 0.0 {
            self.jump_hold_duration
        } else {
            0.0
        };

        // Net acceleration while the button is held
        let accel = self.jump_hold_force - gravity;
        let v_end = v0 + accel * hold;
        if v_end <= 0.0 {
            // Apex is reached while still holding
            let t = v0 / -accel;
            return v0 * t + 0.5 * accel * t * t;
        }

        let y_end = v0 * hold + 0.5 * accel * hold * hold;
        y_end + v_end * v_end / (2.0 * gravity)
    }
}

/// Dash ability
#[derive(Debug, Clone, PartialEq)]
pub struct DashTuning {
    /// Whether the ability has been picked up
    pub unlocked: bool,
    pub distance: f32,
    pub duration: f32,
    /// Wait after a dash ends before the next may start
    pub cooldown: f32,
    /// Hold vertical velocity at zero for the whole dash
    pub air_no_fall: bool,
    /// Spacing of trail samples for the afterimage effect
    pub after_image_interval: f32,
}

pub const BASE_DASH: DashTuning = DashTuning {
    unlocked: false,
    distance: 6.0,
    duration: 0.18,
    cooldown: 0.5,
    air_no_fall: true,
    after_image_interval: 0.03,
};

/// Shortest duration used when converting distance to speed
const MIN_DASH_DURATION: f32 = 0.01;

impl Default for DashTuning {
    fn default() -> Self {
        BASE_DASH
    }
}

impl DashTuning {
    /// Horizontal speed during the dash
    pub fn speed(&self) -> f32 {
        self.distance / self.duration.max(MIN_DASH_DURATION)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        non_negative("dash.distance", self.distance)?;
        positive("dash.duration", self.duration)?;
        non_negative("dash.cooldown", self.cooldown)?;
        positive("dash.after_image_interval", self.after_image_interval)?;
        if self.after_image_interval < FIXED_TIMESTEP {
            return Err(TuningError::OutOfOrder {
                lower: "fixed timestep",
                lower_value: FIXED_TIMESTEP,
                upper: "dash.after_image_interval",
                upper_value: self.after_image_interval,
            });
        }
        Ok(())
    }
}

/// Attack hitboxes and the health pool
#[derive(Debug, Clone, PartialEq)]
pub struct CombatTuning {
    pub max_health: i32,
    pub invul_duration: f32,
    pub blink_interval: f32,
    /// How long a hitbox stays enabled
    pub attack_duration: f32,
    /// Dead time after the hitbox closes
    pub attack_cooldown: f32,
    pub attack_damage: i32,
    /// Distance from the body centre to each hitbox centre
    pub hitbox_reach: f32,
    pub hitbox_half_size: f32,
}

pub const BASE_COMBAT: CombatTuning = CombatTuning {
    max_health: 5,
    invul_duration: 2.0,
    blink_interval: 0.12,
    attack_duration: 0.15,
    attack_cooldown: 0.25,
    attack_damage: 1,
    hitbox_reach: 0.9,
    hitbox_half_size: 0.45,
};

impl Default for CombatTuning {
    fn default() -> Self {
        BASE_COMBAT
    }
}

impl CombatTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("max_health", self.max_health as f32)?;
        non_negative("invul_duration", self.invul_duration)?;
        positive("blink_interval", self.blink_interval)?;
        positive("attack_duration", self.attack_duration)?;
        non_negative("attack_cooldown", self.attack_cooldown)?;
        non_negative("attack_damage", self.attack_damage as f32)?;
        positive("hitbox_half_size", self.hitbox_half_size)?;
        Ok(())
    }
}

/// Everything needed to spawn the player
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStats {
    pub movement: MovementTuning,
    pub dash: DashTuning,
    pub combat: CombatTuning,
    /// Collider width in world units
    pub width: f32,
    /// Collider height in world units
    pub height: f32,
}

pub const BASE_STATS: CharacterStats = CharacterStats {
    movement: BASE_MOVEMENT,
    dash: BASE_DASH,
    combat: BASE_COMBAT,
    width: 1.0,
    height: 2.0,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        self.movement.validate()?;
        self.dash.validate()?;
        self.combat.validate()
    }
}
