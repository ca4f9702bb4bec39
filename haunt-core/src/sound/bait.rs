//! Sound bait: a thrown lure that keeps shouting High until it fades away.

use glam::Vec3;

use crate::sound::{SoundTier, TieredEmitter};
use crate::timer::{Countdown, Fade, Task};

/// Seconds between re-emissions.
pub const BAIT_PULSE_INTERVAL: f32 = 0.1;
/// How long each pulse keeps the High flag raised.
pub const BAIT_PULSE_DURATION: f32 = 0.3;
/// Default lifetime (and fade-out length) of a bait.
pub const BAIT_LIFETIME: f32 = 2.0;

/// A short-lived High-tier emitter at a fixed position.
#[derive(Debug, Clone)]
pub struct SoundBait {
    position: Vec3,
    emitter: TieredEmitter,
    pulse: Countdown,
    life: Fade,
}

impl SoundBait {
    /// Drop a bait at `position` that lives for `lifetime` seconds.
    #[must_use]
    pub fn new(position: Vec3, lifetime: f32) -> Self {
        let mut emitter = TieredEmitter::new();
        emitter.emit(SoundTier::High, BAIT_PULSE_DURATION);
        Self {
            position,
            emitter,
            pulse: Countdown::started(BAIT_PULSE_INTERVAL),
            life: Fade::out(1.0, lifetime),
        }
    }

    /// Where the bait lies.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The bait's tier flags, for perception polling.
    #[must_use]
    pub fn emitter(&self) -> &TieredEmitter {
        &self.emitter
    }

    /// Audio / visual fade level, 1 → 0 over the lifetime.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.life.volume()
    }

    /// Whether the bait is still around.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life.is_active()
    }

    /// Advance one tick. Returns `false` once the bait has expired.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.life.is_active() {
            return false;
        }
        self.emitter.advance(dt);
        if self.pulse.advance(dt) {
            self.emitter.emit(SoundTier::High, BAIT_PULSE_DURATION);
            self.pulse.start(BAIT_PULSE_INTERVAL);
        }
        if self.life.advance(dt) {
            self.emitter.silence();
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_emitting_high_while_alive() {
        let mut bait = SoundBait::new(Vec3::ZERO, BAIT_LIFETIME);
        for _ in 0..100 {
            assert!(bait.advance(0.016));
            assert!(bait.emitter().is_emitting(SoundTier::High));
        }
    }

    #[test]
    fn expires_and_falls_silent() {
        let mut bait = SoundBait::new(Vec3::ZERO, 0.5);
        let mut ticks = 0;
        while bait.advance(0.05) {
            ticks += 1;
            assert!(ticks < 100, "bait never expired");
        }
        assert!(!bait.is_alive());
        assert!(!bait.emitter().any_active());
        assert!(bait.volume().abs() < 1e-5);
    }

    #[test]
    fn volume_fades_linearly() {
        let mut bait = SoundBait::new(Vec3::ZERO, 2.0);
        bait.advance(1.0);
        assert!((bait.volume() - 0.5).abs() < 1e-4);
    }
}
