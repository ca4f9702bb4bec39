//! Random roam: wander around the spawn point while nothing is going on.
//!
//! `Picking → Travelling → Waiting → Picking ...` until cancelled.

use glam::Vec3;
use rand::Rng;
use tracing::trace;

use crate::config::AgentSettings;
use crate::providers::NavigationProvider;
use crate::timer::{Countdown, Task};

#[derive(Debug, Clone, Copy, PartialEq)]
enum RoamPhase {
    Picking,
    Travelling { goal: Vec3, elapsed: f32 },
    Waiting(Countdown),
    Cancelled,
}

/// What a roam step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoamStep {
    /// Nothing changed phase.
    Continue,
    /// A new roam point was chosen and requested.
    Picked(Vec3),
    /// No navigable point was found; waiting before retrying.
    NoPoint,
}

/// An indefinite wander task anchored at a spawn point.
#[derive(Debug, Clone)]
pub struct RoamTask {
    anchor: Vec3,
    phase: RoamPhase,
}

impl RoamTask {
    /// Start roaming around `anchor`.
    #[must_use]
    pub fn new(anchor: Vec3) -> Self {
        Self {
            anchor,
            phase: RoamPhase::Picking,
        }
    }

    /// Whether the task is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != RoamPhase::Cancelled
    }

    /// Stop roaming for good.
    pub fn cancel(&mut self) {
        self.phase = RoamPhase::Cancelled;
    }

    /// Current travel goal, if travelling.
    #[must_use]
    pub fn goal(&self) -> Option<Vec3> {
        match self.phase {
            RoamPhase::Travelling { goal, .. } => Some(goal),
            _ => None,
        }
    }

    /// Advance one tick.
    pub fn advance<N, R>(&mut self, dt: f32, nav: &mut N, settings: &AgentSettings, rng: &mut R) -> RoamStep
    where
        N: NavigationProvider + ?Sized,
        R: Rng,
    {
        match &mut self.phase {
            RoamPhase::Cancelled => RoamStep::Continue,
            RoamPhase::Picking => {
                let point = (0..settings.roam_sample_attempts.max(1)).find_map(|_| {
                    let candidate = self.anchor + random_in_unit_sphere(rng) * settings.roam_radius;
                    nav.sample_position(candidate, settings.roam_sample_distance)
                });
                match point {
                    Some(goal) if nav.set_destination(goal) => {
                        trace!(%goal, "Roam point picked");
                        self.phase = RoamPhase::Travelling { goal, elapsed: 0.0 };
                        RoamStep::Picked(goal)
                    }
                    _ => {
                        self.phase = RoamPhase::Waiting(Countdown::started(random_wait(settings, rng)));
                        RoamStep::NoPoint
                    }
                }
            }
            RoamPhase::Travelling { goal, elapsed } => {
                *elapsed += dt;
                let arrived = nav.position().distance(*goal) <= settings.patrol_point_tolerance;
                if arrived || *elapsed >= settings.roam_travel_timeout {
                    self.phase = RoamPhase::Waiting(Countdown::started(random_wait(settings, rng)));
                }
                RoamStep::Continue
            }
            RoamPhase::Waiting(wait) => {
                if wait.advance(dt) || !wait.is_active() {
                    self.phase = RoamPhase::Picking;
                }
                RoamStep::Continue
            }
        }
    }
}

fn random_wait<R: Rng>(settings: &AgentSettings, rng: &mut R) -> f32 {
    if settings.roam_wait_max > settings.roam_wait_min {
        rng.gen_range(settings.roam_wait_min..=settings.roam_wait_max)
    } else {
        settings.roam_wait_min
    }
}

/// Uniform point inside the unit ball.
pub fn random_in_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
