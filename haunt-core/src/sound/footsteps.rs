//! Player footstep cadence: turns locomotion into tiered noise.
//!
//! Sprinting is loud (High), walking is Normal, crouching is Low. The first
//! step after starting to move lands at half the interval so a quick shuffle
//! still makes a sound.

use serde::{Deserialize, Serialize};

use crate::config::FootstepConfig;
use crate::sound::{SoundTier, TieredEmitter};

/// How the player is moving this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gait {
    /// Not moving.
    #[default]
    Still,
    /// Ordinary walking.
    Walk,
    /// Running.
    Sprint,
    /// Sneaking.
    Crouch,
}

impl Gait {
    /// Hearing tier a step at this gait raises.
    #[must_use]
    pub fn tier(self) -> Option<SoundTier> {
        match self {
            Self::Still => None,
            Self::Walk => Some(SoundTier::Normal),
            Self::Sprint => Some(SoundTier::High),
            Self::Crouch => Some(SoundTier::Low),
        }
    }

    fn pitch(self) -> f32 {
        match self {
            Self::Sprint => 1.15,
            Self::Crouch => 0.9,
            Self::Still | Self::Walk => 1.0,
        }
    }
}

/// One step taken this tick, for the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footstep {
    /// Hearing tier that was raised.
    pub tier: SoundTier,
    /// Playback volume.
    pub volume: f32,
    /// Base playback pitch (the audio layer adds its own jitter).
    pub pitch: f32,
}

/// Step timer driving a [`TieredEmitter`].
#[derive(Debug, Clone)]
pub struct FootstepCadence {
    config: FootstepConfig,
    step_timer: f32,
    was_moving: bool,
}

impl FootstepCadence {
    /// A cadence using `config`.
    #[must_use]
    pub fn new(config: FootstepConfig) -> Self {
        Self {
            config,
            step_timer: 0.0,
            was_moving: false,
        }
    }

    fn interval(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Sprint => self.config.sprint_interval,
            Gait::Crouch => self.config.crouch_interval,
            Gait::Still | Gait::Walk => self.config.walk_interval,
        }
    }

    fn volume(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Sprint => self.config.sprint_volume,
            Gait::Crouch => self.config.crouch_volume,
            Gait::Still | Gait::Walk => self.config.walk_volume,
        }
    }

    /// Advance one tick. Emits on `emitter` and returns the step when one
    /// lands.
    pub fn advance(&mut self, gait: Gait, dt: f32, emitter: &mut TieredEmitter) -> Option<Footstep> {
        let Some(tier) = gait.tier() else {
            self.step_timer = 0.0;
            self.was_moving = false;
            return None;
        };

        let interval = self.interval(gait);
        self.step_timer += dt;
        if !self.was_moving {
            self.step_timer = interval * 0.5;
            self.was_moving = true;
        }

        if self.step_timer < interval {
            return None;
        }
        self.step_timer = 0.0;
        emitter.emit(tier, self.config.sound_duration);
        Some(Footstep {
            tier,
            volume: self.volume(gait),
            pitch: gait.pitch(),
        })
    }
}
