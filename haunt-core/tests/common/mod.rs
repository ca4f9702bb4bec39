//! Test doubles for the capability traits.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use glam::Vec3;

use haunt_core::health::Health;
use haunt_core::providers::{DamageTargets, EmitterSnapshot, NavigationProvider, RayHit, SpatialQueryProvider};
use haunt_core::sound::emitter::EmitterState;
use haunt_core::types::{ActorId, EmitterId, TargetRef};

/// Kinematic nav agent: walks straight at its destination when `step` is
/// called, with no obstacles.
#[derive(Debug, Clone)]
pub struct TestNav {
    pub position: Vec3,
    pub forward: Vec3,
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopping: f32,
    pub stopped: bool,
    pub disabled: bool,
    pub velocity: f32,
    pub frozen: bool,
}

impl TestNav {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::Z,
            destination: None,
            speed: 0.0,
            stopping: 0.0,
            stopped: true,
            disabled: false,
            velocity: 0.0,
            frozen: false,
        }
    }

    /// Move towards the destination for `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.velocity = 0.0;
        if self.disabled || self.stopped || self.frozen {
            return;
        }
        let Some(goal) = self.destination else {
            return;
        };
        let to_goal = goal - self.position;
        let distance = to_goal.length();
        if distance <= self.stopping {
            return;
        }
        let travel = (self.speed * dt).min(distance);
        if let Some(dir) = to_goal.try_normalize() {
            self.position += dir * travel;
            self.forward = dir;
            self.velocity = self.speed;
        }
    }
}

impl NavigationProvider for TestNav {
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
        self.speed = speed;
    }
    fn speed(&self) -> f32 {
        self.speed
    }
    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping = distance;
    }
    fn stopping_distance(&self) -> f32 {
        self.stopping
    }
    fn set_destination(&mut self, destination: Vec3) -> bool {
        if self.disabled {
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
        self.destination.map_or(0.0, |d| d.distance(self.position))
    }
    fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
        Some(Vec3::new(point.x, 0.0, point.z))
    }
    fn is_on_nav_surface(&self) -> bool {
        !self.disabled
    }
    fn disable(&mut self) {
        self.disabled = true;
        self.destination = None;
    }
}

/// A world with at most one target, an optional occluder flag and a list
/// of emitters. Counts the rays cast into it.
#[derive(Debug, Clone, Default)]
pub struct TestWorld {
    pub target: Option<TargetRef>,
    pub occluded: bool,
    pub emitters: Vec<EmitterSnapshot>,
    pub rays_cast: Cell<u32>,
}

impl TestWorld {
    pub fn with_target(position: Vec3) -> Self {
        Self {
            target: Some(TargetRef::new(ActorId::new(), position)),
            ..Self::default()
        }
    }

    pub fn emit(&mut self, position: Vec3, state: EmitterState) {
        self.emitters.push(EmitterSnapshot {
            id: EmitterId::new(),
            position,
            state,
        });
    }
}

impl SpatialQueryProvider for TestWorld {
    fn locate_target(&self, _tag: &str) -> Option<TargetRef> {
        self.target
    }

    fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        self.rays_cast.set(self.rays_cast.get() + 1);
        if self.occluded {
            return Some(RayHit::Geometry);
        }
        self.target.map(|t| RayHit::Actor(t.actor))
    }

    fn emitters_within(&self, center: Vec3, radius: f32) -> Vec<EmitterSnapshot> {
        self.emitters
            .iter()
            .copied()
            .filter(|e| e.position.distance(center) <= radius)
            .collect()
    }
}

/// Damage receivers keyed by actor.
#[derive(Debug, Default)]
pub struct TestVictims {
    pub health: HashMap<ActorId, Health>,
    pub notified: Vec<(ActorId, i32)>,
}

impl DamageTargets for TestVictims {
    fn health_of(&mut self, actor: ActorId) -> Option<&mut Health> {
        self.health.get_mut(&actor)
    }

    fn notify_damage(&mut self, actor: ActorId, amount: i32, _from: Vec3) {
        self.notified.push((actor, amount));
    }
}
