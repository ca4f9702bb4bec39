//! Tiered emitter: three timed loudness flags polled by perception.

use serde::{Deserialize, Serialize};

use crate::sound::SoundTier;
use crate::timer::{Countdown, Task};

/// Default time a tier flag stays raised when no duration is given.
pub const DEFAULT_EMIT_DURATION: f32 = 0.2;

/// Holds an independent "is emitting" flag per tier, each auto-clearing after
/// its own duration.
///
/// Overlapping emissions on the same tier keep the flag raised until the
/// longest of them ends.
#[derive(Debug, Clone, Default)]
pub struct TieredEmitter {
    flags: [Countdown; 3],
}

impl TieredEmitter {
    /// A silent emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `tier` for `duration` seconds.
    pub fn emit(&mut self, tier: SoundTier, duration: f32) {
        self.flags[tier.index()].extend_to(duration);
    }

    /// Whether `tier` is currently raised.
    #[must_use]
    pub fn is_emitting(&self, tier: SoundTier) -> bool {
        self.flags[tier.index()].is_active()
    }

    /// Whether any tier is raised.
    #[must_use]
    pub fn any_active(&self) -> bool {
        self.flags.iter().any(Task::is_active)
    }

    /// Snapshot of the three flags.
    #[must_use]
    pub fn state(&self) -> EmitterState {
        EmitterState {
            low: self.is_emitting(SoundTier::Low),
            normal: self.is_emitting(SoundTier::Normal),
            high: self.is_emitting(SoundTier::High),
        }
    }

    /// Silence every tier at once.
    pub fn silence(&mut self) {
        self.flags.iter_mut().for_each(Task::cancel);
    }

    /// Advance the auto-clear timers.
    pub fn advance(&mut self, dt: f32) {
        for flag in &mut self.flags {
            flag.advance(dt);
        }
    }
}

/// Point-in-time view of an emitter's tier flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterState {
    /// Low tier raised.
    pub low: bool,
    /// Normal tier raised.
    pub normal: bool,
    /// High tier raised.
    pub high: bool,
}

impl EmitterState {
    /// Whether `tier` is raised.
    #[must_use]
    pub fn is_emitting(&self, tier: SoundTier) -> bool {
        match tier {
            SoundTier::Low => self.low,
            SoundTier::Normal => self.normal,
            SoundTier::High => self.high,
        }
    }

    /// A state with only `tier` raised.
    #[must_use]
    pub fn only(tier: SoundTier) -> Self {
        let mut s = Self::default();
        match tier {
            SoundTier::Low => s.low = true,
            SoundTier::Normal => s.normal = true,
            SoundTier::High => s.high = true,
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_clears_after_duration() {
        let mut e = TieredEmitter::new();
        e.emit(SoundTier::High, 0.3);
        assert!(e.is_emitting(SoundTier::High));
        assert!(!e.is_emitting(SoundTier::Low));
        e.advance(0.2);
        assert!(e.is_emitting(SoundTier::High));
        e.advance(0.2);
        assert!(!e.any_active());
    }

    #[test]
    fn tiers_are_independent() {
        let mut e = TieredEmitter::new();
        e.emit(SoundTier::Low, 1.0);
        e.emit(SoundTier::Normal, 0.1);
        e.advance(0.5);
        assert_eq!(e.state(), EmitterState::only(SoundTier::Low));
    }

    #[test]
    fn overlapping_emissions_keep_longest() {
        let mut e = TieredEmitter::new();
        e.emit(SoundTier::Normal, 1.0);
        e.advance(0.1);
        e.emit(SoundTier::Normal, 0.2);
        e.advance(0.5);
        assert!(e.is_emitting(SoundTier::Normal), "earlier longer emission still running");
    }

    #[test]
    fn silence_clears_everything() {
        let mut e = TieredEmitter::new();
        e.emit(SoundTier::Low, 1.0);
        e.emit(SoundTier::High, 1.0);
        e.silence();
        assert!(!e.any_active());
    }
}
