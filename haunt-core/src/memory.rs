//! Short-term memory: where the agent last saw or heard something.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Last known position plus the time since it was refreshed.
///
/// `last_known` is cleared as soon as `time_since_seen` strictly exceeds the
/// agent's memory time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    last_known: Option<Vec3>,
    time_since_seen: f32,
}

impl MemoryState {
    /// Empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `position` and restart the forgetting clock.
    pub fn refresh(&mut self, position: Vec3) {
        self.last_known = Some(position);
        self.time_since_seen = 0.0;
    }

    /// Let `dt` seconds pass. Returns `true` on the call that forgets.
    pub fn decay(&mut self, dt: f32, memory_time: f32) -> bool {
        self.time_since_seen += dt.max(0.0);
        if self.last_known.is_some() && self.time_since_seen > memory_time {
            self.last_known = None;
            return true;
        }
        false
    }

    /// The remembered position, if any.
    #[must_use]
    pub fn recall(&self) -> Option<Vec3> {
        self.last_known
    }

    /// Seconds since the last refresh.
    #[must_use]
    pub fn time_since_seen(&self) -> f32 {
        self.time_since_seen
    }
}
