//! Hit points.
//!
//! Optional per agent: an enemy without a `Health` can never die.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default seconds between death and the `Despawn` cue.
pub const DEFAULT_DESPAWN_DELAY: f32 = 5.0;

/// Integer hit points with `0 <= current <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
    /// Seconds after death before the body is removed. `None` keeps it.
    pub despawn_delay: Option<f32>,
}

impl Health {
    /// Full health with `max` hit points. Non-positive maxima are raised to 1.
    #[must_use]
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            despawn_delay: Some(DEFAULT_DESPAWN_DELAY),
        }
    }

    /// Builder: set or clear the despawn delay.
    #[must_use]
    pub fn with_despawn_delay(mut self, delay: Option<f32>) -> Self {
        self.despawn_delay = delay.filter(|d| d.is_finite() && *d >= 0.0);
        self
    }

    /// Subtract `amount` (negative amounts are ignored), clamping at zero.
    /// Returns `true` when this hit was the killing blow.
    pub fn take_damage(&mut self, amount: i32, hit_point: Vec3) -> bool {
        if !self.is_alive() || amount <= 0 {
            return false;
        }
        self.current = self.current.saturating_sub(amount).max(0);
        debug!(amount, current = self.current, point = %hit_point, "Damage taken");
        !self.is_alive()
    }

    /// Whether any hit points remain.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Current hit points.
    #[must_use]
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut h = Health::new(50);
        assert!(h.take_damage(80, Vec3::ZERO));
        assert_eq!(h.current(), 0);
        assert!(!h.is_alive());
    }

    #[test]
    fn killing_blow_reported_once() {
        let mut h = Health::new(100);
        assert!(!h.take_damage(40, Vec3::ZERO));
        assert!(h.take_damage(60, Vec3::ZERO));
        assert!(!h.take_damage(10, Vec3::ZERO));
    }

    #[test]
    fn negative_damage_does_not_heal() {
        let mut h = Health::new(100);
        h.take_damage(30, Vec3::ZERO);
        h.take_damage(-50, Vec3::ZERO);
        assert_eq!(h.current(), 70);
        assert_eq!(h.max(), 100);
    }

    #[test]
    fn invalid_despawn_delay_is_dropped() {
        let h = Health::new(10).with_despawn_delay(Some(f32::NAN));
        assert!(h.despawn_delay.is_none());
    }
}
