// Presentation pose, derived from the simulation each tick

use glam::Vec2;

use super::combat::HitboxDir;

/// Speed below which a grounded character counts as standing
const RUN_THRESHOLD: f32 = 0.1;

/// What the player looks like this tick. Never read back by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pose {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving horizontally on ground
    Run,
    /// In the air, moving upward
    Jump,
    /// In the air, moving downward
    Fall,
    Dash,
    Attack(HitboxDir),
    Dead,
}

/// The slice of character state a pose is derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseInput {
    pub alive: bool,
    pub in_dash: bool,
    pub attack: Option<HitboxDir>,
    pub grounded: bool,
    pub velocity: Vec2,
}

impl Pose {
    /// Death, then dash, then attack, then plain locomotion
    pub fn derive(input: &PoseInput) -> Self {
        if !input.alive {
            return Self::Dead;
        }
        if input.in_dash {
            return Self::Dash;
        }
        if let Some(dir) = input.attack {
            return Self::Attack(dir);
        }
        if !input.grounded {
            return if input.velocity.y > 0.0 {
                Self::Jump
            } else {
                Self::Fall
            };
        }
        if input.velocity.x.abs() > RUN_THRESHOLD {
            Self::Run
        } else {
            Self::Idle
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Jump | Self::Fall)
    }

    /// Get the animation name for this pose
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Fall => "fall",
            Self::Dash => "dash",
            Self::Attack(HitboxDir::Up) => "attack_up",
            Self::Attack(HitboxDir::Down) => "attack_down",
            Self::Attack(HitboxDir::Left | HitboxDir::Right) => "attack_side",
            Self::Dead => "dead",
        }
    }
}

/// Remembers the previous pose and how long the current one has lasted
#[derive(Debug, Default)]
pub struct PoseTracker {
    current: Pose,
    previous: Pose,
    time_in_pose: f32,
}

impl PoseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's pose. Returns true when it differs from the last one.
    pub fn update(&mut self, pose: Pose, dt: f32) -> bool {
        if pose == self.current {
            self.time_in_pose += dt;
            return false;
        }
        self.previous = self.current;
        self.current = pose;
        self.time_in_pose = 0.0;
        true
    }

    pub fn current(&self) -> Pose {
        self.current
    }

    pub fn previous(&self) -> Pose {
        self.previous
    }

    pub fn time_in_pose(&self) -> f32 {
        self.time_in_pose
    }
}
