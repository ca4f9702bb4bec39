//! Patrol routes: ordered waypoints walked in a loop or back and forth.

use glam::Vec3;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::timer::{Countdown, Task};

/// How the cursor moves past the last waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolMode {
    /// `0, 1, 2, 0, 1, 2, ...`
    #[default]
    Loop,
    /// `0, 1, 2, 1, 0, 1, ...`
    PingPong,
}

/// A waypoint route with a cursor and an optional dwell at each point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    #[serde(default)]
    mode: PatrolMode,
    /// Seconds to wait at each waypoint before heading to the next.
    #[serde(default)]
    dwell: f32,
    #[serde(skip)]
    cursor: usize,
    #[serde(skip, default = "default_forward")]
    forward: bool,
    #[serde(skip)]
    dwell_timer: Countdown,
    #[serde(skip)]
    dwelling: bool,
}

fn default_forward() -> bool {
    true
}

impl PatrolRoute {
    /// A route over `waypoints` starting at the first one.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>, mode: PatrolMode) -> Self {
        Self {
            waypoints,
            mode,
            dwell: 0.0,
            cursor: 0,
            forward: true,
            dwell_timer: Countdown::idle(),
            dwelling: false,
        }
    }

    /// Builder: wait `seconds` at every waypoint.
    #[must_use]
    pub fn with_dwell(mut self, seconds: f32) -> Self {
        self.dwell = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self
    }

    /// Whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Traversal mode.
    #[must_use]
    pub fn mode(&self) -> PatrolMode {
        self.mode
    }

    /// Current cursor index.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The waypoint under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Index of the waypoint closest to `position`.
    #[must_use]
    pub fn nearest_index(&self, position: Vec3) -> Option<usize> {
        self.waypoints
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| OrderedFloat(p.distance_squared(position)))
            .map(|(i, _)| i)
    }

    /// Put the cursor on the waypoint closest to `position` and return it.
    pub fn resume_from(&mut self, position: Vec3) -> Option<Vec3> {
        self.cursor = self.nearest_index(position)?;
        self.dwelling = false;
        self.dwell_timer.cancel();
        self.current()
    }

    /// Move the cursor one step and return the new waypoint.
    pub fn advance(&mut self) -> Option<Vec3> {
        if self.is_empty() {
            return None;
        }
        self.cursor = self.next_index();
        self.current()
    }

    /// Called every tick while the agent stands at the current waypoint.
    /// Returns the next waypoint once any dwell time has elapsed.
    pub fn arrive(&mut self, dt: f32) -> Option<Vec3> {
        if self.is_empty() {
            return None;
        }
        if !self.dwelling {
            if self.dwell <= 0.0 {
                return self.advance();
            }
            self.dwelling = true;
            self.dwell_timer.start(self.dwell);
            return None;
        }
        if self.dwell_timer.advance(dt) {
            self.dwelling = false;
            return self.advance();
        }
        None
    }

    fn next_index(&mut self) -> usize {
        let len = self.waypoints.len();
        if len <= 1 {
            return 0;
        }
        match self.mode {
            PatrolMode::Loop => (self.cursor + 1) % len,
            PatrolMode::PingPong if self.forward => {
                if self.cursor + 1 >= len {
                    self.forward = false;
                    self.cursor - 1
                } else {
                    self.cursor + 1
                }
            }
            PatrolMode::PingPong => {
                if self.cursor == 0 {
                    self.forward = true;
                    1
                } else {
                    self.cursor - 1
                }
            }
        }
    }
}
