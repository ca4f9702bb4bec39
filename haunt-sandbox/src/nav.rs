//! Kinematic navigation agent.
//!
//! Straight-line movement towards the destination with no path planning.
//! A step that would end inside a wall is refused, which is exactly the
//! situation the core's stuck recovery is meant to handle.

use glam::Vec3;

use haunt_core::providers::NavigationProvider;

use crate::geometry::Aabb;

/// One agent's body on the ground plane.
#[derive(Debug, Clone)]
pub struct KinematicAgent {
    position: Vec3,
    forward: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopping_distance: f32,
    stopped: bool,
    enabled: bool,
    velocity: f32,
    walls: Vec<Aabb>,
}

impl KinematicAgent {
    /// Place an agent at `position` facing `forward`, blocked by `walls`.
    #[must_use]
    pub fn new(position: Vec3, forward: Vec3, walls: Vec<Aabb>) -> Self {
        Self {
            position,
            forward: forward.try_normalize().unwrap_or(Vec3::Z),
            destination: None,
            speed: 0.0,
            stopping_distance: 0.0,
            stopped: true,
            enabled: true,
            velocity: 0.0,
            walls,
        }
    }

    fn blocked(&self, point: Vec3) -> bool {
        self.walls.iter().any(|w| w.contains_xz(point))
    }

    /// Move for `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.velocity = 0.0;
        if !self.enabled || self.stopped {
            return;
        }
        let Some(goal) = self.destination else {
            return;
        };
        let to_goal = Vec3::new(goal.x - self.position.x, 0.0, goal.z - self.position.z);
        let distance = to_goal.length();
        if distance <= self.stopping_distance {
            return;
        }
        let Some(direction) = to_goal.try_normalize() else {
            return;
        };
        self.forward = direction;

        let next = self.position + direction * (self.speed * dt).min(distance);
        if self.blocked(next) {
            return;
        }
        self.velocity = self.position.distance(next) / dt.max(f32::EPSILON);
        self.position = next;
    }
}

impl NavigationProvider for KinematicAgent {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn face(&mut self, direction: Vec3) {
        if let Some(dir) = direction.try_normalize() {
            self.forward = dir;
        }
    }

    fn velocity(&self) -> f32 {
        self.velocity
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance.max(0.0);
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_destination(&mut self, destination: Vec3) -> bool {
        if !self.enabled || self.blocked(destination) {
            return false;
        }
        self.destination = Some(destination);
        true
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn reset_path(&mut self) {
        self.destination = None;
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self) -> f32 {
        self.destination.map_or(0.0, |d| {
            Vec3::new(d.x - self.position.x, 0.0, d.z - self.position.z).length()
        })
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let ground = Vec3::new(point.x, 0.0, point.z);
        if (point.y - ground.y).abs() > max_distance + 1.0 || self.blocked(ground) {
            return None;
        }
        Some(ground)
    }

    fn is_on_nav_surface(&self) -> bool {
        self.enabled
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.destination = None;
        self.velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_to_destination_and_stops() {
        let mut agent = KinematicAgent::new(Vec3::ZERO, Vec3::Z, Vec::new());
        agent.set_speed(2.0);
        agent.set_stopped(false);
        assert!(agent.set_destination(Vec3::new(0.0, 0.0, 3.0)));
        for _ in 0..30 {
            agent.step(0.1);
        }
        assert!(agent.position().distance(Vec3::new(0.0, 0.0, 3.0)) < 1e-4);
        assert!(agent.has_arrived());
    }

    #[test]
    fn wall_blocks_movement() {
        let wall = Aabb::new(Vec3::new(-5.0, 0.0, 1.0), Vec3::new(5.0, 3.0, 2.0));
        let mut agent = KinematicAgent::new(Vec3::ZERO, Vec3::Z, vec![wall]);
        agent.set_speed(2.0);
        agent.set_stopped(false);
        agent.set_destination(Vec3::new(0.0, 0.0, 5.0));
        for _ in 0..50 {
            agent.step(0.1);
        }
        assert!(agent.position().z < 1.0);
        assert!(agent.velocity().abs() < f32::EPSILON);
    }

    #[test]
    fn sampling_rejects_walls() {
        let wall = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0));
        let agent = KinematicAgent::new(Vec3::new(5.0, 0.0, 5.0), Vec3::Z, vec![wall]);
        assert!(agent.sample_position(Vec3::ZERO, 2.0).is_none());
        assert_eq!(
            agent.sample_position(Vec3::new(3.0, 0.5, 3.0), 2.0),
            Some(Vec3::new(3.0, 0.0, 3.0))
        );
    }

    #[test]
    fn disabled_agent_refuses_paths() {
        let mut agent = KinematicAgent::new(Vec3::ZERO, Vec3::Z, Vec::new());
        agent.disable();
        assert!(!agent.set_destination(Vec3::X));
        assert!(!agent.is_on_nav_surface());
    }
}
