// Cooldown-gated dash that owns the body's velocity while it runs

use glam::Vec2;
use rapier2d::prelude::{vector, RigidBody};

use super::stats::DashTuning;
use crate::core::math::to_vec2;
use crate::engine::game_loop::FIXED_TIMESTEP;

/// Where the dash is in its cycle. Cooldown is not a phase of its own: a
/// `Ready` dash is usable once `now` passes the armed cooldown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashPhase {
    Ready,
    Dashing {
        /// Locked at activation
        direction: f32,
        speed: f32,
        ends_at: f32,
        next_trail_at: f32,
        /// Gravity scale to put back when the window closes
        saved_gravity_scale: f32,
    },
}

/// What happened to the dash this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashTick {
    Idle,
    Running,
    Ended,
}

#[derive(Debug, Clone)]
pub struct DashController {
    tuning: DashTuning,
    phase: DashPhase,
    cooldown_until: f32,
}

impl DashController {
    /// Trail spacing is raised to at least one fixed step
    pub fn new(mut tuning: DashTuning) -> Self {
        tuning.after_image_interval = tuning.after_image_interval.max(FIXED_TIMESTEP);
        Self {
            tuning,
            phase: DashPhase::Ready,
            cooldown_until: f32::NEG_INFINITY,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, DashPhase::Dashing { .. })
    }

    pub fn phase(&self) -> DashPhase {
        self.phase
    }

    /// Locked direction of the running dash
    pub fn direction(&self) -> Option<f32> {
        match self.phase {
            DashPhase::Dashing { direction, .. } => Some(direction),
            DashPhase::Ready => None,
        }
    }

    pub fn can_start(&self, now: f32) -> bool {
        self.tuning.unlocked && !self.is_active() && now >= self.cooldown_until
    }

    /// Start a dash toward `facing`. Returns the locked direction, or `None`
    /// when locked, already dashing or cooling down.
    pub fn try_start(&mut self, now: f32, facing: f32, body: &mut RigidBody) -> Option<f32> {
        if !self.can_start(now) {
            return None;
        }

        let direction = if facing < 0.0 { -1.0 } else { 1.0 };
        let saved_gravity_scale = body.gravity_scale();

        body.set_linvel(vector![0.0, 0.0], true);
        body.set_gravity_scale(0.0, true);

        self.phase = DashPhase::Dashing {
            direction,
            speed: self.tuning.speed(),
            ends_at: now + self.tuning.duration,
            next_trail_at: now,
            saved_gravity_scale,
        };

        log::debug!("Dash started, direction {}", direction);
        Some(direction)
    }

    /// Advance one tick. Overrides velocity while running, pushes trail
    /// samples into `trail` and restores the body when the window closes.
    pub fn update(&mut self, now: f32, body: &mut RigidBody, trail: &mut Vec<Vec2>) -> DashTick {
        let DashPhase::Dashing {
            direction,
            speed,
            ends_at,
            next_trail_at,
            saved_gravity_scale,
        } = &mut self.phase
        else {
            return DashTick::Idle;
        };
        let (direction, speed, ends_at, saved_gravity_scale) =
            (*direction, *speed, *ends_at, *saved_gravity_scale);

        if now >= ends_at {
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_gravity_scale(saved_gravity_scale, true);
            self.cooldown_until = ends_at + self.tuning.cooldown;
            self.phase = DashPhase::Ready;
            log::debug!("Dash ended, ready again at {:.3}", self.cooldown_until);
            return DashTick::Ended;
        }

        let vy = if self.tuning.air_no_fall {
            0.0
        } else {
            body.linvel().y
        };
        body.set_linvel(vector![direction * speed, vy], true);

        // At most one sample per tick
        if now >= *next_trail_at {
            trail.push(to_vec2(body.translation()));
            *next_trail_at = now + self.tuning.after_image_interval;
        }

        DashTick::Running
    }

    /// Stop a running dash early, putting gravity back. Velocity is left
    /// alone. Returns whether a dash was running.
    pub fn cancel(&mut self, body: &mut RigidBody) -> bool {
        let DashPhase::Dashing {
            saved_gravity_scale,
            ..
        } = self.phase
        else {
            return false;
        };
        body.set_gravity_scale(saved_gravity_scale, true);
        self.phase = DashPhase::Ready;
        log::debug!("Dash cancelled");
        true
    }

    /// Unlock the ability (pickup)
    pub fn grant_dash(&mut self) {
        self.tuning.unlocked = true;
    }

    pub fn has_dash(&self) -> bool {
        self.tuning.unlocked
    }

    /// Change the cooldown used for dashes that end from now on
    pub fn set_cooldown(&mut self, seconds: f32) {
        self.tuning.cooldown = seconds.max(0.0);
    }

    pub fn cooldown_until(&self) -> f32 {
        self.cooldown_until
    }

    pub fn tuning(&self) -> &DashTuning {
        &self.tuning
    }
}
