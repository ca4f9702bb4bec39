//! Movement arbitration.
//!
//! The controller states an intent every tick (`idle`, `patrol`, `move_to`,
//! `chase`) and then calls [`Movement::advance`] once. Intents configure the
//! navigation agent immediately; `advance` runs the long-lived parts: patrol
//! route following, the roam task, stuck recovery and footstep cues.
//!
//! `disable` is one-way. A disabled movement ignores every later intent.

pub mod roam;
pub mod stuck;

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use tracing::{debug, warn};

pub use roam::{RoamStep, RoamTask};
pub use stuck::StuckDetector;

use crate::config::AgentSettings;
use crate::cue::Cue;
use crate::patrol::PatrolRoute;
use crate::providers::NavigationProvider;
use crate::timer::{Countdown, Task};

/// Below this speed the agent counts as standing still.
const MOVING_SPEED: f32 = 0.1;

/// The movement the controller asked for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveIntent {
    /// Stand still.
    Idle,
    /// Follow the route, or roam without one.
    Patrol,
    /// Go to a point.
    MoveTo(Vec3),
    /// Run after a live target position.
    Chase(Vec3),
    /// Permanently off.
    Disabled,
}

/// Side effects of one [`Movement::advance`] worth counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementReport {
    /// A stuck path was reset and reissued.
    pub stuck_recovered: bool,
    /// The roam task picked a new point.
    pub roam_picked: bool,
}

/// Movement state of one agent.
#[derive(Debug, Clone)]
pub struct Movement {
    settings: Arc<AgentSettings>,
    spawn: Vec3,
    intent: MoveIntent,
    route: Option<PatrolRoute>,
    route_engaged: bool,
    roam: Option<RoamTask>,
    stuck: StuckDetector,
    footstep_interval: Option<f32>,
    footstep_timer: Countdown,
    stopped: bool,
    nav_released: bool,
}

impl Movement {
    /// Movement anchored at `spawn` (the roam centre).
    #[must_use]
    pub fn new(settings: Arc<AgentSettings>, spawn: Vec3) -> Self {
        Self {
            settings,
            spawn,
            intent: MoveIntent::Idle,
            route: None,
            route_engaged: false,
            roam: None,
            stuck: StuckDetector::new(),
            footstep_interval: None,
            footstep_timer: Countdown::idle(),
            stopped: true,
            nav_released: false,
        }
    }

    /// Builder: follow `route` while patrolling. Empty routes are ignored.
    #[must_use]
    pub fn with_route(mut self, route: PatrolRoute) -> Self {
        if route.is_empty() {
            warn!("Ignoring empty patrol route");
        } else {
            self.route = Some(route);
        }
        self
    }

    /// Whether `patrol` has anything to do (a route or random roam).
    #[must_use]
    pub fn can_patrol(&self) -> bool {
        self.route.is_some() || self.settings.random_roam
    }

    /// The route, if any.
    #[must_use]
    pub fn route(&self) -> Option<&PatrolRoute> {
        self.route.as_ref()
    }

    /// Current intent.
    #[must_use]
    pub fn intent(&self) -> MoveIntent {
        self.intent
    }

    /// Whether the roam task is running.
    #[must_use]
    pub fn is_roaming(&self) -> bool {
        self.roam.as_ref().is_some_and(RoamTask::is_active)
    }

    /// Whether movement was switched off for good.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.intent == MoveIntent::Disabled
    }

    /// Stand still.
    pub fn idle<N>(&mut self, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        if self.is_disabled() {
            return;
        }
        self.leave_patrol_if(MoveIntent::Idle);
        self.intent = MoveIntent::Idle;
        self.stopped = true;
        nav.set_stopped(true);
        self.footstep_interval = None;
    }

    /// Walk the patrol route, or roam when there is none.
    pub fn patrol<N>(&mut self, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        if self.is_disabled() {
            return;
        }
        self.intent = MoveIntent::Patrol;
        self.stopped = false;
        nav.set_stopped(false);
        nav.set_speed(self.settings.patrol_speed);
        nav.set_stopping_distance(self.settings.patrol_point_tolerance);
        self.footstep_interval = Some(self.settings.roam_footstep_interval);

        if self.route.is_none() && self.settings.random_roam && !self.is_roaming() {
            debug!(anchor = %self.spawn, "Starting random roam");
            self.roam = Some(RoamTask::new(self.spawn));
        }
    }

    /// Head for `point` at chase speed.
    pub fn move_to<N>(&mut self, point: Vec3, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        self.pursue(MoveIntent::MoveTo(point), point, nav);
    }

    /// Run after a target currently at `position`.
    pub fn chase<N>(&mut self, position: Vec3, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        self.pursue(MoveIntent::Chase(position), position, nav);
    }

    fn pursue<N>(&mut self, intent: MoveIntent, point: Vec3, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        if self.is_disabled() || !nav.is_on_nav_surface() {
            return;
        }
        self.leave_patrol_if(intent);
        self.intent = intent;
        self.stopped = false;
        nav.set_stopped(false);
        nav.set_speed(self.settings.chase_speed);
        nav.set_stopping_distance(self.settings.stopping_distance);
        if !nav.set_destination(point) {
            warn!(%point, "Destination rejected by navigation");
        }
        self.footstep_interval = Some(self.settings.chase_footstep_interval);
    }

    /// Cancel everything and stop for good. The navigation agent itself is
    /// switched off on the next [`Movement::advance`].
    pub fn disable(&mut self) {
        if let Some(roam) = self.roam.as_mut() {
            roam.cancel();
        }
        self.roam = None;
        self.intent = MoveIntent::Disabled;
        self.stopped = true;
        self.footstep_interval = None;
        self.footstep_timer.cancel();
        self.stuck.reset();
    }

    fn leave_patrol_if(&mut self, next: MoveIntent) {
        if next == MoveIntent::Patrol {
            return;
        }
        if let Some(roam) = self.roam.as_mut() {
            roam.cancel();
        }
        self.roam = None;
        self.route_engaged = false;
    }

    /// Run one step of the current intent.
    pub fn advance<N, R>(&mut self, dt: f32, nav: &mut N, rng: &mut R, cues: &mut Vec<Cue>) -> MovementReport
    where
        N: NavigationProvider + ?Sized,
        R: Rng,
    {
        let mut report = MovementReport::default();

        if self.is_disabled() {
            if !self.nav_released {
                nav.set_stopped(true);
                nav.reset_path();
                nav.disable();
                self.nav_released = true;
            }
            return report;
        }

        if self.intent == MoveIntent::Patrol {
            if self.route.is_some() {
                self.follow_route(dt, nav);
            } else if let Some(roam) = self.roam.as_mut() {
                let step = roam.advance(dt, nav, &self.settings, rng);
                report.roam_picked = matches!(step, RoamStep::Picked(_));
            }
        }

        report.stuck_recovered = self.check_stuck(dt, nav);
        self.footsteps(dt, nav, cues);
        report
    }

    fn follow_route<N>(&mut self, dt: f32, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        if !nav.is_on_nav_surface() {
            return;
        }
        let position = nav.position();
        let Some(route) = self.route.as_mut() else {
            return;
        };

        let next = if self.route_engaged {
            if nav.has_arrived() { route.arrive(dt) } else { None }
        } else {
            self.route_engaged = true;
            route.resume_from(position)
        };

        if let Some(waypoint) = next
            && !nav.set_destination(waypoint)
        {
            warn!(%waypoint, "Patrol waypoint unreachable");
        }
    }

    fn check_stuck<N>(&mut self, dt: f32, nav: &mut N) -> bool
    where
        N: NavigationProvider + ?Sized,
    {
        let wants_to_move =
            !self.stopped && nav.has_path() && !nav.path_pending() && nav.remaining_distance() > nav.stopping_distance();
        let retry = self.stuck.observe(
            nav.position(),
            dt,
            wants_to_move,
            self.settings.stuck_threshold,
            self.settings.stuck_timeout,
        );
        if !retry {
            return false;
        }
        let Some(destination) = nav.destination() else {
            return false;
        };
        warn!(%destination, stuck_for = self.stuck.stuck_time(), "Agent stuck, reissuing path");
        nav.reset_path();
        nav.set_destination(destination);
        true
    }

    fn footsteps<N>(&mut self, dt: f32, nav: &N, cues: &mut Vec<Cue>)
    where
        N: NavigationProvider + ?Sized,
    {
        let speed = nav.velocity();
        let Some(interval) = self.footstep_interval.filter(|_| speed > MOVING_SPEED) else {
            self.footstep_timer.cancel();
            return;
        };

        self.footstep_timer.advance(dt);
        if self.footstep_timer.is_active() {
            return;
        }
        cues.push(Cue::Footstep { speed });
        let pace = nav.speed() / self.settings.patrol_speed;
        let wait = if pace > 0.0 { interval / pace } else { interval };
        self.footstep_timer.start(wait);
    }
}
