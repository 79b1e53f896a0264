// Ground/wall sensing, horizontal control and the variable-height jump

use rapier2d::prelude::{vector, RigidBody};

use super::stats::MovementTuning;
use crate::core::math::sign_outside;
use crate::engine::input::TickInput;
use crate::engine::physics::{ColliderHandle, CollisionLayer, PhysicsWorld, RigidBodyHandle};

/// Horizontal input needed before the wall probe runs
const WALL_PROBE_DEADZONE: f32 = 0.05;
/// Horizontal input needed before facing flips
const FACING_DEADZONE: f32 = 0.1;
/// Probes start this far inside the collider so touching geometry counts
const PROBE_SKIN: f32 = 0.01;

/// What the probes saw at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Surroundings {
    pub grounded: bool,
    /// Ground-layer geometry right beside the body, in the direction of input
    pub wall_ahead: bool,
}

impl Surroundings {
    /// Probe the ground layer around a body.
    ///
    /// With a collider the probes are boxes hugging its bounds. Without one we
    /// fall back to a circle at the configured ground-check point, and with
    /// neither the body is simply not grounded.
    pub fn sense(
        physics: &PhysicsWorld,
        body: RigidBodyHandle,
        collider: Option<ColliderHandle>,
        tuning: &MovementTuning,
        move_x: f32,
    ) -> Self {
        let bounds = collider.and_then(|handle| physics.collider_bounds(handle));

        let Some((min, max)) = bounds else {
            let grounded = match (physics.get_rigid_body(body), tuning.ground_check) {
                (Some(rb), Some(check)) => {
                    let center = rb.translation() + vector![check.offset.x, check.offset.y];
                    physics
                        .probe_circle(center, check.radius, CollisionLayer::Ground, Some(body))
                        .is_some()
                }
                _ => false,
            };
            return Self {
                grounded,
                wall_ahead: false,
            };
        };

        let width = max.x - min.x;
        let height = max.y - min.y;
        let center_x = (min.x + max.x) / 2.0;

        // Thin box from just inside the feet down to the check distance
        let top = min.y + 2.0 * PROBE_SKIN;
        let bottom = min.y - (tuning.ground_check_distance + PROBE_SKIN);
        let grounded = physics
            .probe_box(
                vector![center_x, (top + bottom) / 2.0],
                vector![width * 0.45, (top - bottom) / 2.0],
                CollisionLayer::Ground,
                Some(body),
            )
            .is_some();

        let wall_ahead = match sign_outside(move_x, WALL_PROBE_DEADZONE) {
            Some(dir) => {
                let edge = if dir > 0.0 { max.x } else { min.x };
                let near = edge - dir * PROBE_SKIN;
                let far = edge + dir * tuning.wall_check_distance;
                physics
                    .probe_box(
                        vector![(near + far) / 2.0, (min.y + max.y) / 2.0],
                        vector![(far - near).abs() / 2.0, height * 0.45],
                        CollisionLayer::Ground,
                        Some(body),
                    )
                    .is_some()
            }
            None => false,
        };

        Self {
            grounded,
            wall_ahead,
        }
    }
}

/// Transient state of the current jump
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpState {
    /// Jump button is down
    pub held: bool,
    /// Pressed while airborne; fires on landing
    pub queued: bool,
    /// Hold-boost still running
    pub boosting: bool,
    pub remaining_hold: f32,
}

/// How a jump was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Pressed while grounded
    Immediate,
    /// Pressed in the air earlier, fired on landing
    Buffered,
}

/// Writes the player's velocity from input every tick
#[derive(Debug, Clone)]
pub struct MovementController {
    tuning: MovementTuning,
    jump: JumpState,
    facing: f32,
    grounded: bool,
    enabled: bool,
}

impl MovementController {
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            tuning,
            jump: JumpState::default(),
            facing: 1.0,
            grounded: false,
            enabled: true,
        }
    }

    /// Run one tick. `in_dash` hands horizontal velocity to the dash.
    pub fn update(
        &mut self,
        input: &TickInput,
        surroundings: Surroundings,
        body: &mut RigidBody,
        in_dash: bool,
        dt: f32,
    ) -> Option<JumpKind> {
        self.grounded = surroundings.grounded;
        if !self.enabled {
            return None;
        }

        let mut velocity = *body.linvel();
        let mut jumped = None;

        if input.jump_pressed {
            if self.grounded {
                self.start_jump(&mut velocity.y);
                jumped = Some(JumpKind::Immediate);
            } else {
                self.jump.queued = true;
            }
        }
        self.jump.held = input.jump_held_after(self.jump.held);
        if !self.jump.held {
            self.jump.boosting = false;
        }

        if !in_dash {
            velocity.x = if surroundings.wall_ahead && !self.grounded {
                // Airborne against a wall: drop instead of clinging
                0.0
            } else {
                input.move_axis.x * self.tuning.move_speed
            };
        }

        // The boost starts on the tick after the impulse
        if self.jump.boosting && self.jump.held && jumped.is_none() {
            if self.jump.remaining_hold > 0.0 {
                let step = dt.min(self.jump.remaining_hold);
                velocity.y += self.tuning.jump_hold_force * step;
                self.jump.remaining_hold -= step;
            } else {
                self.jump.boosting = false;
            }
        }

        if self.grounded && self.jump.queued {
            self.jump.queued = false;
            self.start_jump(&mut velocity.y);
            jumped = Some(JumpKind::Buffered);
        }

        body.set_linvel(velocity, true);

        if let Some(dir) = sign_outside(input.move_axis.x, FACING_DEADZONE) {
            self.facing = dir;
        }

        if let Some(kind) = jumped {
            log::debug!("Jump started ({:?})", kind);
        }
        jumped
    }

    fn start_jump(&mut self, velocity_y: &mut f32) {
        *velocity_y = self.tuning.jump_force;
        self.jump.boosting = true;
        self.jump.remaining_hold = self.tuning.jump_hold_duration.max(0.0);
    }

    /// Stop reacting to input (death). Sensing keeps running.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.jump = JumpState::default();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// +1 right, -1 left
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }
}
