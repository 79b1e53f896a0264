// Math utilities and helper functions

use glam::Vec2;
use rapier2d::prelude::{vector, Real, Vector};

/// Convert a glam vector into rapier's nalgebra vector
pub fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

/// Convert a rapier vector into a glam vector
pub fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Sign of `value` as +1/-1, or `None` while it sits inside the deadzone
pub fn sign_outside(value: f32, deadzone: f32) -> Option<f32> {
    if value > deadzone {
        Some(1.0)
    } else if value < -deadzone {
        Some(-1.0)
    } else {
        None
    }
}

/// Unit vector pointing from `from` to `to`, or `fallback` when the points coincide
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        fallback
    } else {
        dir
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp a move axis into the [-1, 1] box, mapping NaN components to zero
pub fn clamp_axis(axis: Vec2) -> Vec2 {
    let fix = |c: f32| if c.is_nan() { 0.0 } else { c.clamp(-1.0, 1.0) };
    Vec2::new(fix(axis.x), fix(axis.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_conversion() {
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(to_vec2(&to_vector(v)), v);
    }

    #[test]
    fn test_sign_outside() {
        assert_eq!(sign_outside(0.5, 0.1), Some(1.0));
        assert_eq!(sign_outside(-0.5, 0.1), Some(-1.0));
        assert_eq!(sign_outside(0.05, 0.1), None);
        assert_eq!(sign_outside(-0.1, 0.1), None);
    }

    #[test]
    fn test_direction_or() {
        let dir = direction_or(Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::Y);
        assert_eq!(dir, Vec2::X);

        let fallback = direction_or(Vec2::ONE, Vec2::ONE, Vec2::Y);
        assert_eq!(fallback, Vec2::Y);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(Vec2::new(2.0, -3.0)), Vec2::new(1.0, -1.0));
        assert_eq!(clamp_axis(Vec2::new(f32::NAN, 0.5)), Vec2::new(0.0, 0.5));
    }
}
