//! Stuck detection.
//!
//! An agent that wants to move but covers less than `threshold * dt` per step
//! accumulates stuck time. Reaching the timeout asks for exactly one path
//! retry; the episode ends when the agent moves again or stops wanting to.

use glam::Vec3;

/// Per-agent stuck tracker.
#[derive(Debug, Clone, Default)]
pub struct StuckDetector {
    last_position: Option<Vec3>,
    stuck_time: f32,
    retried: bool,
}

impl StuckDetector {
    /// A fresh detector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds spent stuck in the current episode.
    #[must_use]
    pub fn stuck_time(&self) -> f32 {
        self.stuck_time
    }

    /// Forget the current episode.
    pub fn reset(&mut self) {
        self.stuck_time = 0.0;
        self.retried = false;
    }

    /// Record this step's position. Returns `true` on the single step where
    /// the caller should reset and reissue its path.
    pub fn observe(&mut self, position: Vec3, dt: f32, wants_to_move: bool, threshold: f32, timeout: f32) -> bool {
        let previous = self.last_position.replace(position);
        if !wants_to_move || dt <= 0.0 {
            self.reset();
            return false;
        }
        let Some(previous) = previous else {
            return false;
        };

        if previous.distance(position) >= threshold * dt {
            self.reset();
            return false;
        }

        self.stuck_time += dt;
        if self.stuck_time >= timeout && !self.retried {
            self.retried = true;
            return true;
        }
        false
    }
}
