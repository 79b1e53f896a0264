// Health pool shared by the player and enemies

/// Notification emitted on every health mutation: (current, max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChanged {
    pub current: i32,
    pub max: i32,
}

/// What a damage request did to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerable or already depleted; nothing changed
    Ignored,
    /// Health went down (possibly by zero) and the pool is still alive
    Damaged,
    /// This hit brought health to zero. Reported at most once per pool.
    Killed,
}

/// Health with a post-hit invulnerability window
///
/// `0 <= current <= max` holds after every call. The only mutation paths are
/// `take_damage`, `heal` and `set_max`; each one queues a [`HealthChanged`]
/// for the owner to drain.
#[derive(Debug, Clone)]
pub struct HealthPool {
    current: i32,
    max: i32,
    invul_duration: f32,
    blink_interval: f32,
    invulnerable_from: f32,
    invulnerable_until: f32,
    changes: Vec<HealthChanged>,
}

impl HealthPool {
    /// Full pool. `max` below 1 is raised to 1. The initial (max, max)
    /// notification is queued so observers start in sync.
    pub fn new(max: i32, invul_duration: f32, blink_interval: f32) -> Self {
        let max = max.max(1);
        let mut pool = Self {
            current: max,
            max,
            invul_duration: invul_duration.max(0.0),
            blink_interval,
            invulnerable_from: f32::NEG_INFINITY,
            invulnerable_until: f32::NEG_INFINITY,
            changes: Vec::new(),
        };
        pool.notify();
        pool
    }

    /// Pool without any invulnerability window (enemies)
    pub fn without_invulnerability(max: i32) -> Self {
        Self::new(max, 0.0, 0.0)
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn is_invulnerable(&self, now: f32) -> bool {
        now < self.invulnerable_until
    }

    /// Whether the owner should be drawn. Toggles every blink interval while
    /// invulnerable, starting hidden.
    pub fn visible(&self, now: f32) -> bool {
        if !self.is_invulnerable(now) || self.blink_interval <= 0.0 {
            return true;
        }
        let phase = ((now - self.invulnerable_from) / self.blink_interval).floor() as i64;
        phase % 2 == 1
    }

    /// Apply damage at time `now`
    pub fn take_damage(&mut self, amount: i32, now: f32) -> DamageOutcome {
        if self.is_depleted() || self.is_invulnerable(now) {
            return DamageOutcome::Ignored;
        }

        self.current = self.current.saturating_sub(amount.max(0)).clamp(0, self.max);
        self.notify();

        if self.invul_duration > 0.0 {
            self.invulnerable_from = now;
            self.invulnerable_until = now + self.invul_duration;
        }

        if self.is_depleted() {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Restore health, clamped to max. A depleted pool stays depleted.
    pub fn heal(&mut self, amount: i32) {
        if self.is_depleted() {
            return;
        }
        self.current = self.current.saturating_add(amount.max(0)).clamp(0, self.max);
        self.notify();
    }

    /// Change the maximum (at least 1) and re-clamp current
    pub fn set_max(&mut self, max: i32) {
        self.max = max.max(1);
        self.current = self.current.clamp(0, self.max);
        self.notify();
    }

    /// Take the notifications queued since the last drain
    pub fn drain_changes(&mut self) -> Vec<HealthChanged> {
        std::mem::take(&mut self.changes)
    }

    fn notify(&mut self) {
        self.changes.push(HealthChanged {
            current: self.current,
            max: self.max,
        });
    }
}
