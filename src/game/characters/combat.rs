// Directional attack windows

use glam::Vec2;

use super::stats::CombatTuning;

/// Vertical input past this picks an Up/Down hitbox
const VERTICAL_THRESHOLD: f32 = 0.5;
/// Horizontal input past this picks Left/Right
const HORIZONTAL_THRESHOLD: f32 = 0.1;

/// The four attack hitboxes around the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitboxDir {
    Up,
    Down,
    Left,
    Right,
}

impl HitboxDir {
    pub const ALL: [HitboxDir; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Position in [`HitboxDir::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    /// Hitbox centre relative to the body
    pub fn offset(self, horizontal_reach: f32, vertical_reach: f32) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, vertical_reach),
            Self::Down => Vec2::new(0.0, -vertical_reach),
            Self::Left => Vec2::new(-horizontal_reach, 0.0),
            Self::Right => Vec2::new(horizontal_reach, 0.0),
        }
    }

    pub fn from_facing(facing: f32) -> Self {
        if facing < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Pick the hitbox for an attack starting now.
///
/// Precedence, first match wins:
/// 1. up → `Up`
/// 2. down while airborne → `Down`
/// 3. down while grounded → facing side
/// 4. horizontal input → its side
/// 5. otherwise → facing side
pub fn select_hitbox(move_axis: Vec2, grounded: bool, facing: f32) -> HitboxDir {
    if move_axis.y > VERTICAL_THRESHOLD {
        HitboxDir::Up
    } else if move_axis.y < -VERTICAL_THRESHOLD {
        if grounded {
            HitboxDir::from_facing(facing)
        } else {
            HitboxDir::Down
        }
    } else if move_axis.x > HORIZONTAL_THRESHOLD {
        HitboxDir::Right
    } else if move_axis.x < -HORIZONTAL_THRESHOLD {
        HitboxDir::Left
    } else {
        HitboxDir::from_facing(facing)
    }
}

/// Idle → Active → Recovery → Idle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackPhase {
    Idle,
    /// One hitbox enabled until `ends_at`
    Active { hitbox: HitboxDir, ends_at: f32 },
    /// Attack requests are ignored until `until`
    Recovery { until: f32 },
}

#[derive(Debug, Clone)]
pub struct CombatController {
    tuning: CombatTuning,
    phase: AttackPhase,
}

impl CombatController {
    pub fn new(tuning: CombatTuning) -> Self {
        Self {
            tuning,
            phase: AttackPhase::Idle,
        }
    }

    /// Start an attack if idle. The hitbox is chosen once, here.
    pub fn try_attack(
        &mut self,
        now: f32,
        move_axis: Vec2,
        grounded: bool,
        facing: f32,
    ) -> Option<HitboxDir> {
        if self.phase != AttackPhase::Idle {
            return None;
        }
        let hitbox = select_hitbox(move_axis, grounded, facing);
        self.phase = AttackPhase::Active {
            hitbox,
            ends_at: now + self.tuning.attack_duration,
        };
        log::debug!("Attack started: {:?}", hitbox);
        Some(hitbox)
    }

    /// Close expired windows. Returns the hitbox whose window closed this tick.
    pub fn update(&mut self, now: f32) -> Option<HitboxDir> {
        let mut closed = None;

        if let AttackPhase::Active { hitbox, ends_at } = self.phase {
            if now >= ends_at {
                self.phase = AttackPhase::Recovery {
                    until: ends_at + self.tuning.attack_cooldown,
                };
                closed = Some(hitbox);
                log::debug!("Attack ended: {:?}", hitbox);
            }
        }

        if let AttackPhase::Recovery { until } = self.phase {
            if now >= until {
                self.phase = AttackPhase::Idle;
            }
        }

        closed
    }

    /// Drop any attack in progress and return to idle. Returns the hitbox
    /// that was open, if any.
    pub fn cancel(&mut self) -> Option<HitboxDir> {
        let open = self.active_hitbox();
        self.phase = AttackPhase::Idle;
        open
    }

    /// The hitbox currently enabled, if any
    pub fn active_hitbox(&self) -> Option<HitboxDir> {
        match self.phase {
            AttackPhase::Active { hitbox, .. } => Some(hitbox),
            _ => None,
        }
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn damage(&self) -> i32 {
        self.tuning.attack_damage
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }
}
