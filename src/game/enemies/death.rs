// Enemy death sequence: hold the death pose, darken, fade, then remove

use crate::core::math::lerp;

/// Time the death animation plays before any fading
pub const DEATH_HOLD: f32 = 0.4;
pub const DARKEN_DURATION: f32 = 0.25;
pub const MIN_FADE_DURATION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathPhase {
    Dying,
    /// Brightness 1 → 0
    Darken,
    /// Alpha 1 → 0
    Fade,
    /// Ready for removal
    Finished,
}

/// Timer state for one dying enemy, advanced once per tick
#[derive(Debug, Clone)]
pub struct DeathSequence {
    phase: DeathPhase,
    started_at: f32,
    ends_at: f32,
    fade_duration: f32,
}

impl DeathSequence {
    pub fn start(now: f32, destroy_delay: f32) -> Self {
        Self {
            phase: DeathPhase::Dying,
            started_at: now,
            ends_at: now + DEATH_HOLD,
            fade_duration: (destroy_delay - DARKEN_DURATION).max(MIN_FADE_DURATION),
        }
    }

    /// Move through every phase whose end has passed. Returns the phase
    /// entered last, if any changed.
    pub fn advance(&mut self, now: f32) -> Option<DeathPhase> {
        let mut entered = None;
        while self.phase != DeathPhase::Finished && now >= self.ends_at {
            let (next, duration) = match self.phase {
                DeathPhase::Dying => (DeathPhase::Darken, DARKEN_DURATION),
                DeathPhase::Darken => (DeathPhase::Fade, self.fade_duration),
                DeathPhase::Fade | DeathPhase::Finished => (DeathPhase::Finished, 0.0),
            };
            self.phase = next;
            self.started_at = self.ends_at;
            self.ends_at += duration;
            entered = Some(next);
        }
        entered
    }

    /// Fraction of the current phase elapsed, in [0, 1]
    fn progress(&self, now: f32) -> f32 {
        let span = self.ends_at - self.started_at;
        if span <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / span).clamp(0.0, 1.0)
    }

    /// Colour multiplier for presentation
    pub fn brightness(&self, now: f32) -> f32 {
        match self.phase {
            DeathPhase::Dying => 1.0,
            DeathPhase::Darken => lerp(1.0, 0.0, self.progress(now)),
            DeathPhase::Fade | DeathPhase::Finished => 0.0,
        }
    }

    /// Opacity for presentation
    pub fn alpha(&self, now: f32) -> f32 {
        match self.phase {
            DeathPhase::Dying | DeathPhase::Darken => 1.0,
            DeathPhase::Fade => lerp(1.0, 0.0, self.progress(now)),
            DeathPhase::Finished => 0.0,
        }
    }

    pub fn phase(&self) -> DeathPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == DeathPhase::Finished
    }

    pub fn fade_duration(&self) -> f32 {
        self.fade_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_phases_follow_each_other() {
        let mut death = DeathSequence::start(10.0, 1.5);
        assert_eq!(death.phase(), DeathPhase::Dying);
        assert_abs_diff_eq!(death.fade_duration(), 1.25);

        assert_eq!(death.advance(10.3), None);
        assert_eq!(death.advance(10.45), Some(DeathPhase::Darken));
        assert_eq!(death.advance(10.7), Some(DeathPhase::Fade));
        assert_eq!(death.advance(11.85), None);
        assert_eq!(death.advance(11.95), Some(DeathPhase::Finished));
        assert!(death.is_finished());
        assert_eq!(death.advance(50.0), None);
    }

    #[test]
    fn test_short_delay_keeps_minimum_fade() {
        let death = DeathSequence::start(0.0, 0.1);
        assert_eq!(death.fade_duration(), MIN_FADE_DURATION);
    }

    #[test]
    fn test_large_step_skips_to_finished() {
        let mut death = DeathSequence::start(0.0, 1.5);
        assert_eq!(death.advance(100.0), Some(DeathPhase::Finished));
    }

    #[test]
    fn test_brightness_then_alpha() {
        let mut death = DeathSequence::start(0.0, 1.5);
        assert_eq!(death.brightness(0.2), 1.0);
        assert_eq!(death.alpha(0.2), 1.0);

        death.advance(0.4);
        assert_abs_diff_eq!(death.brightness(0.525), 0.5, epsilon = 1e-4);
        assert_eq!(death.alpha(0.525), 1.0);

        death.advance(0.66);
        assert_eq!(death.brightness(0.65), 0.0);
        assert_abs_diff_eq!(death.alpha(1.275), 0.5, epsilon = 1e-4);

        death.advance(2.0);
        assert_eq!(death.alpha(2.0), 0.0);
    }
}
